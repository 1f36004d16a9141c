//! Unpack cached enclosure ZIPs into the unpacked mirror.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::context::PipelineContext;
use super::read_partition_feed;
use crate::error::IndexError;
use crate::models::event::{reason, EventPayload};
use crate::models::Order;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnzipResult {
    pub archives: usize,
    /// Entries written because they were missing or had the wrong size
    pub written: usize,
    pub corrupt: usize,
}

/// Extract `zip_path` into `target_dir`, leaving entries that already exist
/// with the right size untouched. Each entry lands through a temp file, so a
/// failed entry leaves nothing behind. Returns the number of entries written.
pub fn extract_into(zip_path: &Path, target_dir: &Path) -> zip::result::ZipResult<usize> {
    let mut archive = zip::ZipArchive::new(File::open(zip_path)?)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Ignoring unsafe entry {} in {}", entry.name(), zip_path.display());
            continue;
        };
        let target = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Ok(meta) = std::fs::metadata(&target) {
            if meta.len() == entry.size() {
                continue;
            }
        }

        let parent = target.parent().unwrap_or(target_dir);
        std::fs::create_dir_all(parent)?;
        let mut out = tempfile::NamedTempFile::new_in(parent)?;
        io::copy(&mut entry, &mut out)?;
        out.persist(&target).map_err(|e| e.error)?;
        written += 1;
    }

    Ok(written)
}

fn unpacked_dir_for(ctx: &PipelineContext, url: &str) -> Option<PathBuf> {
    ctx.unpacked_path(url)
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

/// Unpack the enclosure ZIP of every filing in the downloadable partitions.
pub async fn unzip_all(ctx: &PipelineContext) -> Result<UnzipResult, IndexError> {
    let worklist = ctx.db.worklist().list_downloadable(Order::Descending).await?;
    let events = ctx.db.events();
    let mut result = UnzipResult::default();

    for entry in &worklist {
        for item in read_partition_feed(ctx, entry)? {
            if ctx.shutdown.is_triggered() {
                info!("Stopping unzip early");
                return Ok(result);
            }
            let Some(url) = item.enclosure.map(|e| e.url).filter(|u| !u.is_empty()) else {
                continue;
            };

            let (Some(zip_path), Some(target_dir)) =
                (ctx.cache_path(&url), unpacked_dir_for(ctx, &url))
            else {
                warn!("Can not map {} to a local path", url);
                continue;
            };
            if !zip_path.is_file() {
                return Err(IndexError::MissingZip(zip_path.display().to_string()));
            }
            let file = zip_path.display().to_string();

            let extracted =
                tokio::task::spawn_blocking(move || extract_into(&zip_path, &target_dir))
                    .await
                    .map_err(io::Error::other)?;

            match extracted {
                Ok(written) => {
                    debug!("{}: {} entries written", file, written);
                    result.archives += 1;
                    result.written += written;
                    events.record(&EventPayload::unzip_success(&file)).await?;
                }
                Err(e) => {
                    warn!("{} is corrupt: {}", file, e);
                    result.corrupt += 1;
                    events
                        .record(&EventPayload::unzip_failed(&file, reason::CORRUPT_ZIP_FILE))
                        .await?;
                }
            }
        }
    }

    Ok(result)
}
