//! Quarterly bulk datasets: download per quarter, then load every cached
//! ZIP of a product into its tables.
//!
//! A published quarter never changes. Downloads are checked by size only
//! and every insert ignores rows whose natural key already exists, so
//! re-running either stage is a no-op.

mod dataset;
mod tsv;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::context::PipelineContext;
use super::download::{CheckMode, DownloadEvent, DownloadResult, Downloader, Expected};
use crate::error::BulkError;
use crate::models::event::{reason, EventPayload};
use crate::models::Order;
use crate::repository::bulk::KnownTags;
use crate::repository::{BulkRepository, DieselError};
use crate::utils::dates::{is_quarter_complete, quarter_from_month, year_quarter};

pub use dataset::{dataset_for, BulkDataset, Fsds, Mfd};
pub use tsv::{load_rows, BulkLoader, TableLoader, CHUNK_SIZE};

/// Entries shipped alongside the data files.
const IGNORED_ENTRIES: &[&str] = &["readme.htm", "readme.html", "rr1-metadata.json"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkIndexResult {
    pub archives: usize,
    pub rows: usize,
}

/// Complete, published quarters covered by the downloadable partitions,
/// oldest first and without duplicates.
pub fn quarters_to_fetch(
    months: &[(i32, u32)],
    dataset: &dyn BulkDataset,
    today: NaiveDate,
) -> Vec<(i32, u32)> {
    let mut quarters = BTreeSet::new();
    for &(year, month) in months {
        let quarter = quarter_from_month(month);
        if !is_quarter_complete(year, quarter, today) {
            debug!("{} is not complete yet", year_quarter(year, quarter));
            continue;
        }
        if dataset.first_quarter().is_some_and(|first| (year, quarter) < first) {
            continue;
        }
        quarters.insert((year, quarter));
    }
    quarters.into_iter().collect()
}

/// Download the product's ZIP for every eligible quarter.
pub async fn download_dataset(
    ctx: &PipelineContext,
    downloader: &Downloader,
    dataset: &dyn BulkDataset,
    today: NaiveDate,
    event_tx: mpsc::Sender<DownloadEvent>,
) -> Result<DownloadResult, BulkError> {
    let worklist = ctx.db.worklist().list_downloadable(Order::Ascending).await?;
    let months: Vec<(i32, u32)> = worklist.iter().map(|e| (e.year, e.month)).collect();
    let quarters = quarters_to_fetch(&months, dataset, today);
    info!(
        "Checking {} {} quarter(s)",
        quarters.len(),
        dataset.data_type()
    );

    let mut result = DownloadResult::default();
    for (year, quarter) in quarters {
        if ctx.shutdown.is_triggered() {
            info!("Stopping {} download early", dataset.data_type());
            break;
        }
        let url = dataset.data_file_url(&ctx.base_url, &year_quarter(year, quarter))?;
        let url = url.as_str();
        let size = downloader.head_content_length(url).await? as i64;
        downloader
            .ensure(url, &Expected::size(size), CheckMode::Size, &event_tx, &mut result)
            .await?;
    }

    Ok(result)
}

fn blocking_error(path: &Path, e: tokio::task::JoinError) -> BulkError {
    BulkError::Io {
        path: path.display().to_string(),
        source: io::Error::other(e),
    }
}

/// (index, name) of every file entry in the archive.
fn list_entries(path: &Path) -> zip::result::ZipResult<Vec<(usize, String)>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if !entry.is_dir() {
            names.push((i, entry.name().to_string()));
        }
    }
    Ok(names)
}

/// Copy one entry into an anonymous temp file, rewound for reading.
fn spool_entry(path: &Path, index: usize) -> zip::result::ZipResult<File> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut entry = archive.by_index(index)?;
    let mut spooled = tempfile::tempfile()?;
    io::copy(&mut entry, &mut spooled)?;
    spooled.seek(SeekFrom::Start(0))?;
    Ok(spooled)
}

fn base_name(entry_name: &str) -> String {
    entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name)
        .to_lowercase()
}

/// Load one product ZIP. Returns the rows written.
pub async fn index_zip(
    ctx: &PipelineContext,
    dataset: &dyn BulkDataset,
    path: &Path,
    known: &mut KnownTags,
) -> Result<usize, BulkError> {
    let owned = path.to_path_buf();
    let names = tokio::task::spawn_blocking(move || list_entries(&owned))
        .await
        .map_err(|e| blocking_error(path, e))??;

    let mut plan = Vec::new();
    for (index, name) in names {
        let name = base_name(&name);
        if IGNORED_ENTRIES.contains(&name.as_str()) {
            continue;
        }
        let loader = dataset
            .loader_for(&name)
            .ok_or_else(|| BulkError::UnknownFileType(name.clone()))?;
        plan.push((index, name, loader));
    }
    plan.sort_by_key(|(_, _, loader)| loader.load_order());

    let repo = ctx.db.bulk();
    let mut rows = 0;
    for (index, name, loader) in plan {
        debug!("Indexing {} into {}", name, loader.table());
        let owned = path.to_path_buf();
        let spooled = tokio::task::spawn_blocking(move || spool_entry(&owned, index))
            .await
            .map_err(|e| blocking_error(path, e))??;
        let inserted = loader.load(&repo, spooled, known).await?;
        debug!("{}: {} new rows", name, inserted);
        rows += inserted;
    }

    Ok(rows)
}

/// Row count of every table the product loads into.
pub async fn table_counts(
    repo: &BulkRepository,
    dataset: &dyn BulkDataset,
) -> Result<Vec<(&'static str, i64)>, DieselError> {
    let mut counts = Vec::with_capacity(dataset.loaders().len());
    for loader in dataset.loaders() {
        counts.push((loader.table(), loader.count(repo).await?));
    }
    Ok(counts)
}

/// Every `*.zip` directly inside `dir`, sorted by name.
fn zip_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut zips: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
        })
        .collect();
    zips.sort();
    Ok(zips)
}

/// Load every cached ZIP of `dataset`.
pub async fn index_dataset(
    ctx: &PipelineContext,
    dataset: &dyn BulkDataset,
) -> Result<BulkIndexResult, BulkError> {
    let events = ctx.db.events();
    let dir = ctx.cache_dir.join(dataset.data_dir_path());
    let dir_name = dir.display().to_string();

    let zips = match zip_files(&dir) {
        Ok(zips) => zips,
        Err(source) => {
            warn!("Can not read {}: {}", dir_name, source);
            events
                .record(&EventPayload::index_failed(
                    &dir_name,
                    reason::ERROR_INSERTING_SECDATA_IN_DATABASE,
                ))
                .await?;
            return Err(BulkError::Io {
                path: dir_name,
                source,
            });
        }
    };

    let mut known = KnownTags::new();
    let mut result = BulkIndexResult::default();

    for zip_path in zips {
        if ctx.shutdown.is_triggered() {
            info!("Stopping {} indexing early", dataset.data_type());
            break;
        }
        let file = zip_path.display().to_string();
        info!("Indexing file {}", file);

        match index_zip(ctx, dataset, &zip_path, &mut known).await {
            Ok(rows) => {
                events.record(&EventPayload::index_success(&file)).await?;
                result.archives += 1;
                result.rows += rows;
            }
            Err(e) => {
                events
                    .record(&EventPayload::index_failed(
                        &file,
                        reason::ERROR_INSERTING_SECDATA_IN_DATABASE,
                    ))
                    .await?;
                return Err(e);
            }
        }
    }

    Ok(result)
}
