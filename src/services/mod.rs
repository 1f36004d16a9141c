//! Pipeline stages.
//!
//! Each stage takes a [`PipelineContext`] and reports progress over a
//! channel, so the CLI (or a test) decides how to present it.

pub mod bulk;
pub mod context;
pub mod download;
pub mod indexer;
pub mod schedule;
pub mod tickers;
pub mod unzip;

pub use context::{PipelineContext, Shutdown};
pub use download::{DownloadEvent, DownloadResult, Downloader};
pub use indexer::{IndexEvent, IndexResult};

use crate::error::IndexError;
use crate::feed::{self, FeedEntry};
use crate::models::WorklistEntry;

/// The cached index feed of a partition. A partition whose feed has not
/// been downloaded yet is an error telling the user what to run first.
pub(crate) fn read_partition_feed(
    ctx: &PipelineContext,
    entry: &WorklistEntry,
) -> Result<Vec<FeedEntry>, IndexError> {
    let path = ctx
        .cache_dir
        .join(feed::index_file_path(entry.year, entry.month));
    if !path.is_file() {
        return Err(IndexError::MissingIndex(path.display().to_string()));
    }
    Ok(feed::read_feed(&path)?)
}
