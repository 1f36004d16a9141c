//! Cache downloader.
//!
//! Every URL maps to `cache_dir/<url path>`. A consistency row in the
//! `downloads` table records what was fetched, so a later run can decide
//! from a HEAD request (or the size published in the feed) whether the local
//! copy is still current. Separated from UI concerns: progress goes out
//! over a [`DownloadEvent`] channel.

mod types;

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::context::PipelineContext;
use super::read_partition_feed;
use super::tickers::{ticker_file_url, TICKER_FILES};
use crate::error::FetchError;
use crate::feed;
use crate::fetch::{HeadResponse, HttpClient, HttpResponse};
use crate::models::event::{reason, EventPayload};
use crate::models::Order;

pub use types::{
    download_percentage, CheckMode, DownloadEvent, DownloadResult, Expected, FetchOutcome,
};

const ERROR_PAGE_MARKER: &[u8] = b"This page is temporarily unavailable.";

fn is_error_page(body: &[u8]) -> bool {
    body.windows(ERROR_PAGE_MARKER.len())
        .any(|w| w == ERROR_PAGE_MARKER)
}

/// Write `body` next to `path` and rename it into place.
fn write_atomic(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(body)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

pub struct Downloader {
    ctx: PipelineContext,
    client: HttpClient,
}

impl Downloader {
    pub fn new(ctx: &PipelineContext) -> Result<Self, FetchError> {
        Ok(Self {
            client: ctx.http_client()?,
            ctx: ctx.clone(),
        })
    }

    pub fn cache_path(&self, url: &str) -> Result<PathBuf, FetchError> {
        self.ctx
            .cache_path(url)
            .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))
    }

    /// Whether the cached copy of `url` is present and still matches what
    /// the archive publishes.
    pub async fn file_in_cache(&self, url: &str, expected: &Expected) -> Result<bool, FetchError> {
        let path = self.cache_path(url)?;
        let on_disk = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta.len() as i64,
            _ => {
                debug!("{} not_in_cache", url);
                return Ok(false);
            }
        };

        let Some(row) = self.ctx.db.downloads().get(url).await? else {
            debug!("{} no_download_in_the_database", url);
            return Ok(false);
        };

        if let Some(etag) = expected.etag.as_deref() {
            if etag.is_empty() || row.etag != etag {
                debug!("{} in_cache_not_consistent (etag {} vs {})", url, row.etag, etag);
                return Ok(false);
            }
        }

        if let Some(size) = expected.size {
            if row.size != size {
                info!("Expected size: {} vs recorded size: {} for {}", size, row.size, url);
                return Ok(false);
            }
        }
        if row.size != on_disk {
            debug!("{} in_cache_not_consistent (size on disk {})", url, on_disk);
            return Ok(false);
        }

        Ok(true)
    }

    async fn get_with_retry(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let attempts = self.ctx.retry_limit.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.client.get(url).await {
                Ok(response) if response.is_success() || response.is_not_found() => {
                    return Ok(response)
                }
                Ok(response) => {
                    let status = response.status.as_u16();
                    let error = FetchError::Status {
                        url: url.to_string(),
                        status,
                    };
                    if !is_retryable(status) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(source) => {
                    last_error = Some(FetchError::Http {
                        url: url.to_string(),
                        source,
                    });
                }
            }
            if attempt < attempts {
                debug!("Retrying {} ({}/{})", url, attempt, attempts);
                tokio::time::sleep(self.ctx.rate_limit).await;
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 0,
        }))
    }

    /// GET `url` into the cache and record it in the consistency store.
    pub async fn fetch(&self, url: &str, mode: CheckMode) -> Result<FetchOutcome, FetchError> {
        let events = self.ctx.db.events();

        if self.ctx.db.skipped().contains(url).await? {
            info!("{} skipped_downloading", url);
            return Ok(FetchOutcome::Skipped);
        }

        let path = self.cache_path(url)?;
        let file = path.display().to_string();

        let response = match self.get_with_retry(url).await {
            Ok(response) => response,
            Err(e) => {
                events
                    .record(&EventPayload::download_failed(&file, url, reason::HTTP_ERROR))
                    .await?;
                return Err(e);
            }
        };

        if response.is_not_found() {
            warn!("{} returned 404, adding to skipped files", url);
            events
                .record(&EventPayload::download_failed(&file, url, reason::NOT_FOUND))
                .await?;
            self.ctx.db.skipped().add(url).await?;
            return Ok(FetchOutcome::Skipped);
        }

        let etag = response.etag().unwrap_or_default().to_string();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => {
                events
                    .record(&EventPayload::download_failed(&file, url, reason::HTTP_ERROR))
                    .await?;
                return Err(FetchError::Http {
                    url: url.to_string(),
                    source,
                });
            }
        };

        if is_error_page(&body) {
            events
                .record(&EventPayload::download_failed(&file, url, reason::PAGE_UNAVAILABLE))
                .await?;
            return Err(FetchError::PageUnavailable(url.to_string()));
        }

        let size = body.len() as i64;
        let target = path.clone();
        let body = tokio::task::spawn_blocking(move || write_atomic(&target, &body).map(|_| body))
            .await
            .map_err(std::io::Error::other)??;

        match mode {
            CheckMode::Etag => self.ctx.db.downloads().upsert_with_etag(url, &etag, size).await?,
            CheckMode::Size => self.ctx.db.downloads().upsert_with_size(url, size).await?,
        }
        events
            .record(&EventPayload::download_success(&file, url))
            .await?;
        debug!("Saved {} ({} bytes)", file, size);

        Ok(FetchOutcome::Fetched { body, etag })
    }

    /// HEAD until `pick` finds what it is looking for or attempts run out.
    async fn head_until<T>(
        &self,
        url: &str,
        pick: impl Fn(&HeadResponse) -> Option<T>,
    ) -> Option<T> {
        let attempts = self.ctx.retry_limit.max(1);
        for attempt in 1..=attempts {
            match self.client.head(url).await {
                Ok(response) if response.is_success() => {
                    if let Some(found) = pick(&response) {
                        return Some(found);
                    }
                    debug!("HEAD {} missing header ({}/{})", url, attempt, attempts);
                }
                Ok(response) => {
                    debug!("HEAD {} returned {} ({}/{})", url, response.status, attempt, attempts);
                }
                Err(e) => warn!("HEAD {} failed: {} ({}/{})", url, e, attempt, attempts),
            }
            if attempt < attempts {
                tokio::time::sleep(self.ctx.rate_limit).await;
            }
        }
        None
    }

    pub async fn head_etag(&self, url: &str) -> Result<String, FetchError> {
        self.head_until(url, |r| r.etag().map(str::to_string))
            .await
            .ok_or_else(|| FetchError::MissingEtag {
                url: url.to_string(),
                attempts: self.ctx.retry_limit.max(1),
            })
    }

    pub async fn head_content_length(&self, url: &str) -> Result<u64, FetchError> {
        self.head_until(url, |r| r.content_length())
            .await
            .ok_or_else(|| FetchError::MissingContentLength {
                url: url.to_string(),
                attempts: self.ctx.retry_limit.max(1),
            })
    }

    /// Fetch `url` unless the cached copy matches `expected`.
    pub async fn ensure(
        &self,
        url: &str,
        expected: &Expected,
        mode: CheckMode,
        event_tx: &mpsc::Sender<DownloadEvent>,
        result: &mut DownloadResult,
    ) -> Result<(), FetchError> {
        let _ = event_tx
            .send(DownloadEvent::Started {
                url: url.to_string(),
            })
            .await;

        if self.file_in_cache(url, expected).await? {
            result.cached += 1;
            let _ = event_tx
                .send(DownloadEvent::Cached {
                    url: url.to_string(),
                })
                .await;
            return Ok(());
        }

        match self.fetch(url, mode).await {
            Ok(FetchOutcome::Fetched { body, .. }) => {
                result.downloaded += 1;
                let _ = event_tx
                    .send(DownloadEvent::Completed {
                        url: url.to_string(),
                        bytes: body.len() as u64,
                    })
                    .await;
                Ok(())
            }
            Ok(FetchOutcome::Skipped) => {
                result.skipped += 1;
                let _ = event_tx
                    .send(DownloadEvent::Skipped {
                        url: url.to_string(),
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                result.failed += 1;
                let _ = event_tx
                    .send(DownloadEvent::Failed {
                        url: url.to_string(),
                        error: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    async fn progress(
        &self,
        event_tx: &mpsc::Sender<DownloadEvent>,
        current: usize,
        total: usize,
    ) {
        let percent = download_percentage(current, total);
        debug!("[{}/{}/{:.2}%]", current, total, percent);
        let _ = event_tx
            .send(DownloadEvent::Progress {
                current,
                total,
                percent,
            })
            .await;
    }

    /// Refresh the monthly index feed of every downloadable partition,
    /// checked by ETag. A partition whose ETag can not be read fails the
    /// whole step.
    pub async fn download_index(
        &self,
        event_tx: mpsc::Sender<DownloadEvent>,
    ) -> anyhow::Result<DownloadResult> {
        let worklist = self.ctx.db.worklist().list_downloadable(Order::Descending).await?;
        let total = worklist.len();
        let mut result = DownloadResult::default();

        for (i, entry) in worklist.iter().enumerate() {
            if self.ctx.shutdown.is_triggered() {
                info!("Stopping index download early");
                break;
            }

            let url = feed::index_url(&self.ctx.base_url, entry.year, entry.month)?;
            let url = url.as_str();
            let etag = self.head_etag(url).await?;
            self.ensure(url, &Expected::etag(etag), CheckMode::Etag, &event_tx, &mut result)
                .await?;
            self.progress(&event_tx, i + 1, total).await;
        }

        Ok(result)
    }

    /// Refresh the company ticker files, checked by ETag like the feeds.
    pub async fn download_tickers(
        &self,
        event_tx: mpsc::Sender<DownloadEvent>,
    ) -> anyhow::Result<DownloadResult> {
        let total = TICKER_FILES.len();
        let mut result = DownloadResult::default();

        for (i, relative) in TICKER_FILES.iter().enumerate() {
            if self.ctx.shutdown.is_triggered() {
                info!("Stopping ticker download early");
                break;
            }

            let url = ticker_file_url(&self.ctx.base_url, relative)?;
            let url = url.as_str();
            let etag = self.head_etag(url).await?;
            self.ensure(url, &Expected::etag(etag), CheckMode::Etag, &event_tx, &mut result)
                .await?;
            self.progress(&event_tx, i + 1, total).await;
        }

        Ok(result)
    }

    /// Download every file listed in the feeds of downloadable partitions.
    /// URLs already indexed from a local copy are left alone.
    pub async fn download_files(
        &self,
        event_tx: mpsc::Sender<DownloadEvent>,
    ) -> anyhow::Result<DownloadResult> {
        let worklist = self.ctx.db.worklist().list_downloadable(Order::Descending).await?;
        let indexed = self.ctx.db.filings().indexed_urls_with_path().await?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for entry in &worklist {
            for item in read_partition_feed(&self.ctx, entry)? {
                for file in item.files() {
                    if !indexed.contains(&file.url) && seen.insert(file.url.clone()) {
                        files.push(file.clone());
                    }
                }
            }
        }

        let total = files.len();
        info!("{} files to check, {} already indexed", total, indexed.len());
        let mut result = DownloadResult::default();

        for (i, file) in files.iter().enumerate() {
            if self.ctx.shutdown.is_triggered() {
                info!("Stopping file download early");
                break;
            }

            let size = file.size_bytes()?;
            if size == 0 {
                warn!("{} has no size in the feed, skipping", file.url);
                result.skipped += 1;
            } else {
                self.ensure(&file.url, &Expected::size(size), CheckMode::Etag, &event_tx, &mut result)
                    .await?;
            }
            self.progress(&event_tx, i + 1, total).await;
        }

        Ok(result)
    }

    /// Download the per-filing enclosure ZIPs, checked by the length the
    /// feed publishes.
    pub async fn download_zips(
        &self,
        event_tx: mpsc::Sender<DownloadEvent>,
    ) -> anyhow::Result<DownloadResult> {
        let worklist = self.ctx.db.worklist().list_downloadable(Order::Descending).await?;

        let mut enclosures = Vec::new();
        for entry in &worklist {
            for item in read_partition_feed(&self.ctx, entry)? {
                if let Some(enclosure) = item.enclosure.filter(|e| !e.url.is_empty()) {
                    enclosures.push(enclosure);
                }
            }
        }

        let total = enclosures.len();
        let mut result = DownloadResult::default();

        for (i, enclosure) in enclosures.iter().enumerate() {
            if self.ctx.shutdown.is_triggered() {
                info!("Stopping zip download early");
                break;
            }

            match enclosure.length_bytes() {
                Ok(length) if length > 0 => {
                    self.ensure(
                        &enclosure.url,
                        &Expected::size(length),
                        CheckMode::Size,
                        &event_tx,
                        &mut result,
                    )
                    .await?;
                }
                _ => {
                    warn!(
                        "{} has unusable length {:?}, skipping",
                        enclosure.url, enclosure.length
                    );
                    result.skipped += 1;
                }
            }
            self.progress(&event_tx, i + 1, total).await;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_percentage() {
        assert_eq!(download_percentage(1, 4), 25.0);
        assert_eq!(download_percentage(4, 4), 100.0);
        assert_eq!(download_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_is_error_page() {
        assert!(is_error_page(
            b"<html><body><h1>This page is temporarily unavailable.</h1></body></html>"
        ));
        assert!(!is_error_page(b"<rss></rss>"));
    }

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Archives/edgar/monthly/xbrlrss-2021-06.xml");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
