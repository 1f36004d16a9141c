//! Consistency store: what was last fetched for each URL.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use super::models::{DownloadRecord, NewDownload};
use super::pool::{DbPool, DieselError};
use super::util::now_rfc3339;
use crate::schema::downloads;
use crate::with_conn;

#[derive(Clone)]
pub struct DownloadRepository {
    pool: DbPool,
}

impl DownloadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, url: &str) -> Result<Option<DownloadRecord>, DieselError> {
        with_conn!(self.pool, conn => {
            downloads::table
                .find(url)
                .select(DownloadRecord::as_select())
                .first(&mut conn)
                .await
                .optional()
        })
    }

    /// Record a fetch checked by ETag. Overwrites the previous row.
    pub async fn upsert_with_etag(
        &self,
        url: &str,
        etag: &str,
        size: i64,
    ) -> Result<(), DieselError> {
        let now = now_rfc3339();
        let row = NewDownload {
            url,
            etag,
            size,
            updated_at: &now,
        };

        with_conn!(self.pool, conn => {
            diesel::insert_into(downloads::table)
                .values(&row)
                .on_conflict(downloads::url)
                .do_update()
                .set((
                    downloads::etag.eq(excluded(downloads::etag)),
                    downloads::size.eq(excluded(downloads::size)),
                    downloads::updated_at.eq(excluded(downloads::updated_at)),
                ))
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }

    /// Record a fetch checked by size only. A stored ETag is cleared so it
    /// can not vouch for content it did not describe.
    pub async fn upsert_with_size(&self, url: &str, size: i64) -> Result<(), DieselError> {
        self.upsert_with_etag(url, "", size).await
    }

    pub async fn count(&self) -> Result<i64, DieselError> {
        with_conn!(self.pool, conn => {
            downloads::table.count().get_result(&mut conn).await
        })
    }
}
