//! Filing indexer: feed entries plus their cached files into the store.
//!
//! Two paths exist. [`index_files`] upserts one `filing_files` row per file
//! listed in the feed, with the body read from the cache or the unpacked
//! mirror. [`index_zip_contents`] reads the per-filing enclosure ZIPs and
//! inserts each entry into `filing_zip_files`.

mod types;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::context::PipelineContext;
use super::download::download_percentage;
use super::read_partition_feed;
use crate::error::{FeedError, IndexError};
use crate::feed::{self, FeedEntry, FileRef};
use crate::models::event::{reason, EventPayload};
use crate::models::Order;
use crate::repository::models::{FilingFileChanges, NewFilingFile, NewFilingZipFile};
use crate::repository::util::now_rfc3339;
use crate::utils::html;

pub use types::{IndexEvent, IndexResult, ZipEntry};

/// Numeric filing fields, parsed once per feed entry.
struct FilingNumbers {
    enclosure_length: i64,
    cik: i64,
    sic: i32,
    fiscal_year_end: i32,
}

impl FilingNumbers {
    fn parse(entry: &FeedEntry) -> Result<Self, FeedError> {
        let enclosure_length = match &entry.enclosure {
            Some(enclosure) => enclosure.length_bytes()?,
            None => 0,
        };
        Ok(Self {
            enclosure_length,
            cik: entry.filing.cik()?,
            sic: entry.filing.sic()?,
            fiscal_year_end: entry.filing.fiscal_year_end_number()?,
        })
    }
}

/// Local copy of `url`: the cache first, then the unpacked mirror.
pub fn resolve_local_path(ctx: &PipelineContext, url: &str) -> Option<PathBuf> {
    [ctx.cache_path(url), ctx.unpacked_path(url)]
        .into_iter()
        .flatten()
        .find(|p| p.is_file())
}

async fn progress(event_tx: &mpsc::Sender<IndexEvent>, current: usize, total: usize) {
    let percent = download_percentage(current, total);
    info!("[{}/{}/{:.2}%]", current, total, percent);
    let _ = event_tx
        .send(IndexEvent::Progress {
            current,
            total,
            percent,
        })
        .await;
}

/// Index every file of every downloadable partition.
pub async fn index_files(
    ctx: &PipelineContext,
    event_tx: mpsc::Sender<IndexEvent>,
) -> Result<IndexResult, IndexError> {
    let worklist = ctx.db.worklist().list_downloadable(Order::Descending).await?;
    let feeds = worklist
        .iter()
        .map(|entry| read_partition_feed(ctx, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let total = feed::total_file_count(&feeds);
    let skipped = ctx.db.skipped().all().await?;
    let mut result = IndexResult::default();
    let mut current = 0;

    'entries: for entry in feeds.iter().flatten() {
        let numbers = FilingNumbers::parse(entry)?;
        for file in entry.files() {
            if ctx.shutdown.is_triggered() {
                info!("Stopping indexing early");
                break 'entries;
            }
            current += 1;

            if skipped.contains(&file.url) {
                debug!("{} is in skipped files", file.url);
                result.skipped += 1;
            } else {
                index_file(ctx, entry, &numbers, file, &event_tx, &mut result).await?;
            }
            progress(&event_tx, current, total).await;
        }
    }

    Ok(result)
}

async fn index_file(
    ctx: &PipelineContext,
    entry: &FeedEntry,
    numbers: &FilingNumbers,
    file: &FileRef,
    event_tx: &mpsc::Sender<IndexEvent>,
    result: &mut IndexResult,
) -> Result<(), IndexError> {
    let events = ctx.db.events();
    let local = resolve_local_path(ctx, &file.url);
    let indexable = html::is_indexable(&file.file);

    let body = match &local {
        Some(path) if indexable => {
            let bytes = tokio::fs::read(path).await?;
            html::extract_body(&file.file, &bytes)
        }
        _ => String::new(),
    };

    if indexable && local.is_none() {
        warn!("{} could_not_find_file", file.url);
        events
            .record(&EventPayload::index_failed(&file.url, reason::COULD_NOT_FIND_FILE))
            .await?;
        result.missing += 1;
        let _ = event_tx
            .send(IndexEvent::Missing {
                url: file.url.clone(),
            })
            .await;
    }

    let path = local
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let enclosure = entry.enclosure.clone().unwrap_or_default();
    let now = now_rfc3339();

    let row = NewFilingFile {
        changes: FilingFileChanges {
            title: &entry.title,
            link: &entry.link,
            guid: &entry.guid,
            enclosure_url: &enclosure.url,
            enclosure_length: numbers.enclosure_length,
            enclosure_type: &enclosure.enclosure_type,
            description: &entry.description,
            pub_date: &entry.pub_date,
            company_name: &entry.filing.company_name,
            form_type: &entry.filing.form_type,
            filing_date: &entry.filing.filing_date,
            cik_number: numbers.cik,
            accession_number: &entry.filing.accession_number,
            file_number: &entry.filing.file_number,
            acceptance_datetime: &entry.filing.acceptance_datetime,
            period: &entry.filing.period,
            assistant_director: &entry.filing.assistant_director,
            assigned_sic: numbers.sic,
            fiscal_year_end: numbers.fiscal_year_end,
            xbrl_sequence: file.sequence_number()?,
            xbrl_file: &file.file,
            xbrl_type: &file.file_type,
            xbrl_size: file.size_bytes()?,
            xbrl_description: &file.description,
            xbrl_inline: file.is_inline()?,
            xbrl_url: &file.url,
            xbrl_body: &body,
            xbrl_path: &path,
            updated_at: &now,
        },
        created_at: &now,
    };

    if let Err(e) = ctx.db.filings().upsert(&row).await {
        events
            .record(&EventPayload::index_failed(
                &file.url,
                reason::ERROR_INSERTING_IN_DATABASE,
            ))
            .await?;
        let _ = event_tx
            .send(IndexEvent::Failed {
                url: file.url.clone(),
                error: e.to_string(),
            })
            .await;
        return Err(e.into());
    }

    if local.is_some() || !indexable {
        events.record(&EventPayload::index_success(&file.url)).await?;
        result.indexed += 1;
        let _ = event_tx
            .send(IndexEvent::Indexed {
                url: file.url.clone(),
            })
            .await;
    }

    Ok(())
}

/// CIK and accession number from `.../<cik>/<accession>/<name>.zip`.
pub fn cik_and_accession(zip_path: &Path) -> Option<(String, String)> {
    let mut dirs = zip_path
        .parent()?
        .components()
        .rev()
        .filter_map(|c| c.as_os_str().to_str());
    let accession = dirs.next()?.to_string();
    let cik = dirs.next()?.to_string();
    Some((cik, accession))
}

/// Read every file entry of a ZIP. Bodies are kept for indexable names only.
pub fn read_zip_entries(path: &Path) -> zip::result::ZipResult<Vec<ZipEntry>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let size = file.size() as i64;
        let body = if html::is_indexable(&name) {
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            html::extract_body(&name, &bytes)
        } else {
            String::new()
        };
        entries.push(ZipEntry { name, size, body });
    }

    Ok(entries)
}

/// Index the entries of every enclosure ZIP listed in the downloadable
/// partitions' feeds.
pub async fn index_zip_contents(
    ctx: &PipelineContext,
    event_tx: mpsc::Sender<IndexEvent>,
) -> Result<IndexResult, IndexError> {
    let worklist = ctx.db.worklist().list_downloadable(Order::Descending).await?;
    let feeds = worklist
        .iter()
        .map(|entry| read_partition_feed(ctx, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let events = ctx.db.events();
    let filings = ctx.db.filings();
    let total = feed::total_enclosure_count(&feeds);
    let mut result = IndexResult::default();
    let mut current = 0;

    for entry in feeds.iter().flatten() {
        let Some(url) = entry
            .enclosure
            .as_ref()
            .map(|e| e.url.as_str())
            .filter(|u| !u.is_empty())
        else {
            continue;
        };
        if ctx.shutdown.is_triggered() {
            info!("Stopping zip indexing early");
            break;
        }
        current += 1;

        let zip_path = ctx
            .cache_path(url)
            .filter(|p| p.is_file())
            .ok_or_else(|| IndexError::MissingZip(url.to_string()));
        let zip_path = match zip_path {
            Ok(path) => path,
            Err(e) => {
                events
                    .record(&EventPayload::index_failed(url, reason::ZIP_FILE_DOES_NOT_EXIST))
                    .await?;
                return Err(e);
            }
        };
        let file = zip_path.display().to_string();

        let (cik, accession) = cik_and_accession(&zip_path)
            .ok_or_else(|| IndexError::MissingZip(file.clone()))?;
        let cik: i64 = cik.parse().map_err(|_| FeedError::Field {
            field: "cik",
            value: cik.clone(),
        })?;

        let path = zip_path.clone();
        let entries = tokio::task::spawn_blocking(move || read_zip_entries(&path))
            .await
            .map_err(std::io::Error::other)?;
        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                warn!("{} is corrupt: {}", file, e);
                events
                    .record(&EventPayload::index_failed(&file, reason::CORRUPT_ZIP_FILE))
                    .await?;
                result.corrupt += 1;
                let _ = event_tx
                    .send(IndexEvent::Failed {
                        url: url.to_string(),
                        error: e.to_string(),
                    })
                    .await;
                continue;
            }
        };

        for zip_entry in &entries {
            let row = NewFilingZipFile {
                cik_number: cik,
                accession_number: &accession,
                xbrl_file: &zip_entry.name,
                xbrl_size: zip_entry.size,
                xbrl_body: &zip_entry.body,
            };
            match filings.insert_zip_file(&row).await {
                Ok(true) => result.zip_entries += 1,
                Ok(false) => {}
                Err(e) => {
                    events
                        .record(&EventPayload::index_failed(
                            &file,
                            reason::ERROR_INSERTING_IN_DATABASE,
                        ))
                        .await?;
                    return Err(e.into());
                }
            }
        }

        events.record(&EventPayload::index_success(&file)).await?;
        result.indexed += 1;
        let _ = event_tx
            .send(IndexEvent::Indexed {
                url: url.to_string(),
            })
            .await;
        progress(&event_tx, current, total).await;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cik_and_accession() {
        let path = Path::new(
            "/cache/Archives/edgar/data/320193/000032019321000065/0000320193-21-000065-xbrl.zip",
        );
        assert_eq!(
            cik_and_accession(path),
            Some(("320193".to_string(), "000032019321000065".to_string()))
        );
        assert_eq!(cik_and_accession(Path::new("a.zip")), None);
    }

    #[test]
    fn test_read_zip_entries() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filing.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer
            .start_file("report.htm", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<p>Net income</p>").unwrap();
        writer
            .start_file("chart.jpg", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&[0xff, 0xd8, 0xff]).unwrap();
        writer.finish().unwrap();

        let entries = read_zip_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].body, "Net income");
        assert_eq!(entries[1].size, 3);
        assert!(entries[1].body.is_empty());
    }

    #[test]
    fn test_corrupt_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(read_zip_entries(&path).is_err());
    }
}
