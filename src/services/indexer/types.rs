//! Indexer types and events.

/// Events emitted while indexing.
#[derive(Debug, Clone)]
pub enum IndexEvent {
    Indexed { url: String },
    /// Indexable file with no local copy
    Missing { url: String },
    Failed { url: String, error: String },
    Progress {
        current: usize,
        total: usize,
        percent: f64,
    },
}

/// Tally of one indexing run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexResult {
    pub indexed: usize,
    pub missing: usize,
    pub skipped: usize,
    /// ZIP path only: entries newly written.
    pub zip_entries: usize,
    pub corrupt: usize,
}

/// One entry read out of an enclosure ZIP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub name: String,
    pub size: i64,
    pub body: String,
}
