//! Download service types and events.

/// Events emitted during download operations.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// A URL is about to be checked or fetched
    Started { url: String },
    /// Local copy already matches the archive
    Cached { url: String },
    /// Fetched and written to the cache
    Completed { url: String, bytes: u64 },
    /// Denylisted or 404
    Skipped { url: String },
    Failed { url: String, error: String },
    /// Position within the current run
    Progress {
        current: usize,
        total: usize,
        percent: f64,
    },
}

/// Tally of one download run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub downloaded: usize,
    pub cached: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// How a fetched file is later checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    Etag,
    Size,
}

/// What the archive currently says about a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expected {
    pub etag: Option<String>,
    pub size: Option<i64>,
}

impl Expected {
    pub fn etag(etag: impl Into<String>) -> Self {
        Self {
            etag: Some(etag.into()),
            size: None,
        }
    }

    pub fn size(size: i64) -> Self {
        Self {
            etag: None,
            size: Some(size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { body: Vec<u8>, etag: String },
    /// Denylisted, or answered 404 and now denylisted.
    Skipped,
}

/// `current / total * 100`, or zero for an empty run.
pub fn download_percentage(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    current as f64 / total as f64 * 100.0
}
