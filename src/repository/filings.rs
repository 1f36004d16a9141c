//! Indexed filing files, from the per-file path and the enclosure ZIP path.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{FilingFileRecord, NewFilingFile, NewFilingZipFile};
use super::pool::{DbPool, DieselError};
use crate::models::FilingFile;
use crate::schema::{filing_files, filing_zip_files};
use crate::with_conn;

#[derive(Clone)]
pub struct FilingRepository {
    pool: DbPool,
}

impl FilingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a filing file, or refresh every column of the row that has
    /// the same file reference.
    pub async fn upsert(&self, file: &NewFilingFile<'_>) -> Result<(), DieselError> {
        with_conn!(self.pool, conn => {
            diesel::insert_into(filing_files::table)
                .values(file)
                .on_conflict((
                    filing_files::xbrl_sequence,
                    filing_files::xbrl_file,
                    filing_files::xbrl_type,
                    filing_files::xbrl_size,
                    filing_files::xbrl_description,
                    filing_files::xbrl_inline,
                    filing_files::xbrl_url,
                ))
                .do_update()
                .set(&file.changes)
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }

    /// Insert a ZIP entry unless one with the same key exists.
    /// Returns whether a row was written.
    pub async fn insert_zip_file(&self, file: &NewFilingZipFile<'_>) -> Result<bool, DieselError> {
        let rows = with_conn!(self.pool, conn => {
            diesel::insert_into(filing_zip_files::table)
                .values(file)
                .on_conflict((
                    filing_zip_files::cik_number,
                    filing_zip_files::accession_number,
                    filing_zip_files::xbrl_file,
                    filing_zip_files::xbrl_size,
                ))
                .do_nothing()
                .execute(&mut conn)
                .await
        })?;
        Ok(rows > 0)
    }

    pub async fn get_by_url(&self, url: &str) -> Result<Vec<FilingFile>, DieselError> {
        let records: Vec<FilingFileRecord> = with_conn!(self.pool, conn => {
            filing_files::table
                .filter(filing_files::xbrl_url.eq(url))
                .order(filing_files::id.asc())
                .select(FilingFileRecord::as_select())
                .load(&mut conn)
                .await
        })?;
        Ok(records.into_iter().map(FilingFile::from).collect())
    }

    /// URLs already indexed from a local copy.
    pub async fn indexed_urls_with_path(&self) -> Result<HashSet<String>, DieselError> {
        let urls: Vec<String> = with_conn!(self.pool, conn => {
            filing_files::table
                .filter(filing_files::xbrl_path.ne(""))
                .select(filing_files::xbrl_url)
                .distinct()
                .load(&mut conn)
                .await
        })?;
        Ok(urls.into_iter().collect())
    }

    pub async fn count(&self) -> Result<i64, DieselError> {
        with_conn!(self.pool, conn => {
            filing_files::table.count().get_result(&mut conn).await
        })
    }

    pub async fn count_zip_files(&self) -> Result<i64, DieselError> {
        with_conn!(self.pool, conn => {
            filing_zip_files::table.count().get_result(&mut conn).await
        })
    }
}
