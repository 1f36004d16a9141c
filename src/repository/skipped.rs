//! Denylist of URLs the archive answered with 404.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::NewSkippedFile;
use super::pool::{DbPool, DieselError};
use super::util::now_rfc3339;
use crate::schema::skipped_files;
use crate::with_conn;

#[derive(Clone)]
pub struct SkippedFileRepository {
    pool: DbPool,
}

impl SkippedFileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, url: &str) -> Result<(), DieselError> {
        let now = now_rfc3339();
        with_conn!(self.pool, conn => {
            diesel::insert_into(skipped_files::table)
                .values(&NewSkippedFile {
                    url,
                    created_at: &now,
                })
                .on_conflict(skipped_files::url)
                .do_nothing()
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }

    pub async fn contains(&self, url: &str) -> Result<bool, DieselError> {
        let found: Option<String> = with_conn!(self.pool, conn => {
            skipped_files::table
                .find(url)
                .select(skipped_files::url)
                .first(&mut conn)
                .await
                .optional()
        })?;
        Ok(found.is_some())
    }

    pub async fn all(&self) -> Result<HashSet<String>, DieselError> {
        let urls: Vec<String> = with_conn!(self.pool, conn => {
            skipped_files::table
                .select(skipped_files::url)
                .load(&mut conn)
                .await
        })?;
        Ok(urls.into_iter().collect())
    }
}
