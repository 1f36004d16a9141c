//! Repository layer for database persistence.
//!
//! All access goes through Diesel with diesel-async. SQLite is the default
//! backend; PostgreSQL is available with the `postgres` feature.

pub mod bulk;
pub mod context;
pub mod downloads;
pub mod events;
pub mod filings;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod skipped;
pub mod tickers;
pub mod util;
pub mod worklist;

pub use bulk::BulkRepository;
pub use context::DbContext;
pub use downloads::DownloadRepository;
pub use events::EventRepository;
pub use filings::FilingRepository;
pub use migrations::run_migrations;
pub use pool::{DbError, DbPool, DieselError};
pub use skipped::SkippedFileRepository;
pub use tickers::TickerRepository;
pub use worklist::WorklistRepository;

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
