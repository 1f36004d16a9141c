//! Database context: the pool plus accessors for every repository.

use super::bulk::BulkRepository;
use super::downloads::DownloadRepository;
use super::events::EventRepository;
use super::filings::FilingRepository;
use super::migrations::run_migrations;
use super::pool::{DbError, DbPool};
use super::skipped::SkippedFileRepository;
use super::tickers::TickerRepository;
use super::worklist::WorklistRepository;

/// Entry point for all database access.
///
/// ```ignore
/// let db = DbContext::from_url("edgar.db")?;
/// db.migrate().await?;
/// let months = db.worklist().list_downloadable(Order::Descending).await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
    database_url: String,
}

impl DbContext {
    /// Supports SQLite paths or `sqlite:` URLs, and `postgres://` URLs
    /// with the `postgres` feature.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        Ok(Self {
            pool: DbPool::from_url(url)?,
            database_url: url.to_string(),
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        run_migrations(&self.database_url).await
    }

    pub fn worklist(&self) -> WorklistRepository {
        WorklistRepository::new(self.pool.clone())
    }

    pub fn downloads(&self) -> DownloadRepository {
        DownloadRepository::new(self.pool.clone())
    }

    pub fn skipped(&self) -> SkippedFileRepository {
        SkippedFileRepository::new(self.pool.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.pool.clone())
    }

    pub fn filings(&self) -> FilingRepository {
        FilingRepository::new(self.pool.clone())
    }

    pub fn bulk(&self) -> BulkRepository {
        BulkRepository::new(self.pool.clone())
    }

    pub fn tickers(&self) -> TickerRepository {
        TickerRepository::new(self.pool.clone())
    }
}
