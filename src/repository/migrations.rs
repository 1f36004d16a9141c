//! Schema migrations using cetane.
//!
//! The migrator is synchronous, so it runs on a blocking task.

use cetane::migrator::{MigrationStateStore, Migrator};
use tracing::info;

use super::pool::DieselError;
use super::util::is_postgres_url;

/// Apply every pending migration for a database URL.
pub async fn run_migrations(database_url: &str) -> Result<(), DieselError> {
    if is_postgres_url(database_url) {
        #[cfg(feature = "postgres")]
        {
            return run_postgres_migrations(database_url).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            return Err(migration_error(
                "PostgreSQL support not compiled. Use --features postgres",
            ));
        }
    }
    run_sqlite_migrations(database_url).await
}

fn migration_error(msg: impl std::fmt::Display) -> DieselError {
    DieselError::QueryBuilderError(msg.to_string().into())
}

fn report(applied: &[String]) {
    for name in applied {
        info!("Applied migration: {}", name);
    }
    if applied.is_empty() {
        info!("No pending migrations");
    }
}

async fn run_sqlite_migrations(database_url: &str) -> Result<(), DieselError> {
    let path = database_url
        .strip_prefix("sqlite:")
        .unwrap_or(database_url)
        .to_string();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = std::path::Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(migration_error)?;
            }
        }

        let conn = rusqlite::Connection::open(&path).map_err(migration_error)?;
        let backend = cetane::backend::Sqlite;
        let registry = crate::migrations::registry();
        let state = SqliteState::new(&conn)?;

        let mut migrator = Migrator::new(&registry, &backend, state);
        let applied = migrator
            .migrate_forward(|sql| conn.execute_batch(sql).map_err(|e| e.to_string()))
            .map_err(migration_error)?;

        report(&applied);
        Ok(())
    })
    .await
    .map_err(|e| DieselError::QueryBuilderError(Box::new(e)))?
}

/// Applied-migration bookkeeping in `__cetane_migrations`.
struct SqliteState<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> SqliteState<'a> {
    fn new(conn: &'a rusqlite::Connection) -> Result<Self, DieselError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS __cetane_migrations (
                name TEXT PRIMARY KEY NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .map_err(migration_error)?;
        Ok(Self { conn })
    }
}

impl MigrationStateStore for SqliteState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM __cetane_migrations ORDER BY name")
            .map_err(|e| e.to_string())?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| e.to_string())?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| e.to_string())?;
        Ok(names)
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO __cetane_migrations (name) VALUES (?1)",
                [name],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute("DELETE FROM __cetane_migrations WHERE name = ?1", [name])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(feature = "postgres")]
async fn run_postgres_migrations(database_url: &str) -> Result<(), DieselError> {
    use std::cell::RefCell;

    use diesel_async::{AsyncConnection, AsyncPgConnection};

    let url = database_url.to_string();
    let rt = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || {
        let conn = rt
            .block_on(AsyncPgConnection::establish(&url))
            .map_err(migration_error)?;
        let conn = RefCell::new(conn);
        let backend = cetane::backend::Postgres;
        let registry = crate::migrations::registry();
        let state = PostgresState::new(&rt, &conn)?;

        let mut migrator = Migrator::new(&registry, &backend, state);
        let applied = migrator
            .migrate_forward(|sql| {
                use diesel_async::SimpleAsyncConnection;
                rt.block_on(conn.borrow_mut().batch_execute(sql))
                    .map_err(|e| e.to_string())
            })
            .map_err(migration_error)?;

        report(&applied);
        Ok(())
    })
    .await
    .map_err(|e| DieselError::QueryBuilderError(Box::new(e)))?
}

#[cfg(feature = "postgres")]
#[derive(diesel::QueryableByName)]
struct AppliedName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}

#[cfg(feature = "postgres")]
struct PostgresState<'a> {
    rt: &'a tokio::runtime::Handle,
    conn: &'a std::cell::RefCell<diesel_async::AsyncPgConnection>,
}

#[cfg(feature = "postgres")]
impl<'a> PostgresState<'a> {
    fn new(
        rt: &'a tokio::runtime::Handle,
        conn: &'a std::cell::RefCell<diesel_async::AsyncPgConnection>,
    ) -> Result<Self, DieselError> {
        use diesel_async::SimpleAsyncConnection;

        rt.block_on(conn.borrow_mut().batch_execute(
            "CREATE TABLE IF NOT EXISTS __cetane_migrations (
                name TEXT PRIMARY KEY NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        ))?;
        Ok(Self { rt, conn })
    }
}

#[cfg(feature = "postgres")]
impl MigrationStateStore for PostgresState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, String> {
        use diesel_async::RunQueryDsl;

        let rows: Vec<AppliedName> = self
            .rt
            .block_on(
                diesel::sql_query("SELECT name FROM __cetane_migrations ORDER BY name")
                    .load(&mut *self.conn.borrow_mut()),
            )
            .map_err(|e| e.to_string())?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), String> {
        use diesel::sql_types::Text;
        use diesel_async::RunQueryDsl;

        let query = diesel::sql_query(
            "INSERT INTO __cetane_migrations (name) VALUES ($1) ON CONFLICT DO NOTHING",
        )
        .bind::<Text, _>(name.to_string());
        self.rt
            .block_on(query.execute(&mut *self.conn.borrow_mut()))
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), String> {
        use diesel::sql_types::Text;
        use diesel_async::RunQueryDsl;

        let query = diesel::sql_query("DELETE FROM __cetane_migrations WHERE name = $1")
            .bind::<Text, _>(name.to_string());
        self.rt
            .block_on(query.execute(&mut *self.conn.borrow_mut()))
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
