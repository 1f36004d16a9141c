//! Worklist partitions: one row per (year, month) of the archive.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorklistEntry {
    pub year: i32,
    pub month: u32,
    pub will_download: bool,
    pub updated_at: DateTime<Utc>,
}

/// Sort order for downloadable partitions.
///
/// Ascending suits a full backfill, descending a daily sync that should
/// reach the newest month first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}
