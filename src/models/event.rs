//! Pipeline events and their aggregation into daily/hourly health stats.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure reasons recorded on events.
pub mod reason {
    pub const COULD_NOT_FIND_FILE: &str = "could_not_find_file";
    pub const ERROR_INSERTING_IN_DATABASE: &str = "error_inserting_in_database";
    pub const ERROR_INSERTING_SECDATA_IN_DATABASE: &str = "error_inserting_secdata_in_database";
    pub const ERROR_INSERTING_CIK_IN_DATABASE: &str = "error_inserting_cik_in_database";
    pub const ERROR_INSERTING_TICKER_IN_DATABASE: &str = "error_inserting_ticker_in_database";
    pub const ZIP_FILE_DOES_NOT_EXIST: &str = "zip_file_does_not_exist";
    pub const CORRUPT_ZIP_FILE: &str = "corrupt_zip_file";
    pub const PAGE_UNAVAILABLE: &str = "page_temporarily_unavailable";
    pub const HTTP_ERROR: &str = "http_error";
    pub const NOT_FOUND: &str = "not_found";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Failed,
}

/// One entry of the append-only event log, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum EventPayload {
    Index {
        file: String,
        status: EventStatus,
        #[serde(default)]
        reason: String,
    },
    Download {
        file: String,
        url: String,
        status: EventStatus,
        #[serde(default)]
        reason: String,
    },
    Unzip {
        file: String,
        status: EventStatus,
        #[serde(default)]
        reason: String,
    },
    Other {
        job: String,
        status: EventStatus,
    },
}

impl EventPayload {
    pub fn index_success(file: impl Into<String>) -> Self {
        Self::Index {
            file: file.into(),
            status: EventStatus::Success,
            reason: String::new(),
        }
    }

    pub fn index_failed(file: impl Into<String>, reason: &str) -> Self {
        Self::Index {
            file: file.into(),
            status: EventStatus::Failed,
            reason: reason.to_string(),
        }
    }

    pub fn download_success(file: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Download {
            file: file.into(),
            url: url.into(),
            status: EventStatus::Success,
            reason: String::new(),
        }
    }

    pub fn download_failed(file: impl Into<String>, url: impl Into<String>, reason: &str) -> Self {
        Self::Download {
            file: file.into(),
            url: url.into(),
            status: EventStatus::Failed,
            reason: reason.to_string(),
        }
    }

    pub fn unzip_success(file: impl Into<String>) -> Self {
        Self::Unzip {
            file: file.into(),
            status: EventStatus::Success,
            reason: String::new(),
        }
    }

    pub fn unzip_failed(file: impl Into<String>, reason: &str) -> Self {
        Self::Unzip {
            file: file.into(),
            status: EventStatus::Failed,
            reason: reason.to_string(),
        }
    }

    pub fn other(job: impl Into<String>, status: EventStatus) -> Self {
        Self::Other {
            job: job.into(),
            status,
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            Self::Index { status, .. }
            | Self::Download { status, .. }
            | Self::Unzip { status, .. }
            | Self::Other { status, .. } => *status,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Time bucket for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Day,
    Hour,
}

impl Bucket {
    fn key(&self, at: &DateTime<Utc>) -> String {
        match self {
            Bucket::Day => at.format("%Y-%m-%d").to_string(),
            Bucket::Hour => at.format("%Y-%m-%d %H:00").to_string(),
        }
    }
}

/// Counters for one time bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub period: String,
    pub files_downloaded: u64,
    pub files_broken: u64,
    pub files_indexed: u64,
}

impl EventStats {
    /// 2 is healthy, 1 means something broke or nothing happened, 0 means both.
    pub fn health(&self) -> u8 {
        let mut health = 2;
        if self.files_broken > 0 {
            health -= 1;
        }
        if self.files_downloaded + self.files_indexed == 0 {
            health -= 1;
        }
        health
    }

    fn record(&mut self, event: &EventPayload) {
        match event {
            EventPayload::Download {
                status: EventStatus::Success,
                ..
            } => self.files_downloaded += 1,
            EventPayload::Download {
                status: EventStatus::Failed,
                ..
            }
            | EventPayload::Unzip {
                status: EventStatus::Failed,
                ..
            } => self.files_broken += 1,
            EventPayload::Index {
                status: EventStatus::Success,
                ..
            } => self.files_indexed += 1,
            _ => {}
        }
    }
}

/// Group events into buckets, newest bucket first.
pub fn aggregate<'a, I>(events: I, bucket: Bucket) -> Vec<EventStats>
where
    I: IntoIterator<Item = (&'a DateTime<Utc>, &'a EventPayload)>,
{
    let mut buckets: BTreeMap<String, EventStats> = BTreeMap::new();
    for (at, event) in events {
        let key = bucket.key(at);
        buckets
            .entry(key.clone())
            .or_insert_with(|| EventStats {
                period: key,
                ..Default::default()
            })
            .record(event);
    }
    buckets.into_values().rev().collect()
}

/// Totals of successful and failed downloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadCounts {
    pub successful: u64,
    pub failed: u64,
}

pub fn download_counts<'a, I>(events: I) -> DownloadCounts
where
    I: IntoIterator<Item = &'a EventPayload>,
{
    let mut counts = DownloadCounts::default();
    for event in events {
        if let EventPayload::Download { status, .. } = event {
            match status {
                EventStatus::Success => counts.successful += 1,
                EventStatus::Failed => counts.failed += 1,
            }
        }
    }
    counts
}
