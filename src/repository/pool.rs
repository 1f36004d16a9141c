//! Connection pool over the two supported backends.
//!
//! SQLite is the default store for a single-host cron job. PostgreSQL is
//! available behind the `postgres` feature for shared deployments. The
//! backend is picked from the database URL at runtime.

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};

#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
#[cfg(feature = "postgres")]
use diesel_async::AsyncPgConnection;

use super::util::{is_postgres_url, to_diesel_error};

pub type DbError = diesel::result::Error;

/// Error type returned by every repository method.
pub type DieselError = diesel::result::Error;

/// Async SQLite connection type.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

#[cfg(feature = "postgres")]
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// SQLite "pool". Connections are opened on demand; SQLite handles
/// concurrent readers itself and the pipeline writes sequentially.
#[derive(Clone, Debug)]
pub struct SqlitePool {
    database_url: String,
}

impl SqlitePool {
    pub fn new(database_url: &str) -> Self {
        let url = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
        Self {
            database_url: url.to_string(),
        }
    }

    /// Open a connection with a busy timeout so a concurrent `stats` run
    /// does not fail a long bulk insert.
    pub async fn get(&self) -> Result<SqliteConn, DbError> {
        let mut conn = SqliteConn::establish(&self.database_url)
            .await
            .map_err(to_diesel_error)?;
        conn.batch_execute("PRAGMA busy_timeout = 5000;").await?;
        Ok(conn)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct PgPool {
    pool: DeadPool<AsyncPgConnection>,
}

#[cfg(feature = "postgres")]
impl PgPool {
    pub fn new(database_url: &str, max_size: usize) -> Result<Self, DbError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = DeadPool::builder(manager)
            .max_size(max_size)
            .build()
            .map_err(to_diesel_error)?;
        Ok(Self { pool })
    }

    pub async fn get(&self) -> Result<PgConn, DbError> {
        self.pool.get().await.map_err(to_diesel_error)
    }
}

/// Database pool shared by all repositories.
#[derive(Clone)]
pub enum DbPool {
    Sqlite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

impl DbPool {
    /// Pick the backend from a database URL.
    ///
    /// - `postgres://` or `postgresql://` → PostgreSQL (feature `postgres`)
    /// - anything else → SQLite file path, optionally prefixed with `sqlite:`
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if is_postgres_url(url) {
            #[cfg(feature = "postgres")]
            {
                return Ok(DbPool::Postgres(PgPool::new(url, 4)?));
            }
            #[cfg(not(feature = "postgres"))]
            {
                return Err(to_diesel_error(
                    "PostgreSQL support not compiled. Use --features postgres",
                ));
            }
        }

        Ok(DbPool::Sqlite(SqlitePool::new(url)))
    }

    pub fn is_sqlite(&self) -> bool {
        matches!(self, DbPool::Sqlite(_))
    }
}

/// Run a block with a connection from whichever backend the pool wraps.
///
/// ```ignore
/// with_conn!(self.pool, conn => {
///     downloads::table.find(url).first::<DownloadRecord>(&mut conn).await.optional()
/// })
/// ```
#[macro_export]
macro_rules! with_conn {
    ($pool:expr, $conn:ident => $body:expr) => {{
        match &$pool {
            $crate::repository::pool::DbPool::Sqlite(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
            #[cfg(feature = "postgres")]
            $crate::repository::pool::DbPool::Postgres(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
        }
    }};
}

pub use with_conn;
