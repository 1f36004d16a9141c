//! Diesel records for the pipeline tables.
//!
//! Bulk dataset rows live in [`super::bulk`] next to their insert logic.

use diesel::prelude::*;

use crate::models::{FilingFile, Ticker, WorklistEntry};
use crate::schema;

use super::parse_datetime;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::worklist)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorklistRecord {
    pub year: i32,
    pub month: i32,
    pub will_download: bool,
    pub updated_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::worklist)]
pub struct NewWorklistEntry<'a> {
    pub year: i32,
    pub month: i32,
    pub will_download: bool,
    pub updated_at: &'a str,
}

impl From<WorklistRecord> for WorklistEntry {
    fn from(r: WorklistRecord) -> Self {
        Self {
            year: r.year,
            month: r.month as u32,
            will_download: r.will_download,
            updated_at: parse_datetime(&r.updated_at),
        }
    }
}

/// Consistency row for one cached URL.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = schema::downloads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DownloadRecord {
    pub url: String,
    pub etag: String,
    pub size: i64,
    pub updated_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::downloads)]
pub struct NewDownload<'a> {
    pub url: &'a str,
    pub etag: &'a str,
    pub size: i64,
    pub updated_at: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::skipped_files)]
pub struct NewSkippedFile<'a> {
    pub url: &'a str,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRecord {
    pub id: i32,
    pub ev: String,
    pub created_at: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::events)]
pub struct NewEvent<'a> {
    pub ev: &'a str,
    pub created_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::filing_files)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FilingFileRecord {
    pub id: i32,
    pub company_name: String,
    pub form_type: String,
    pub filing_date: String,
    pub cik_number: i64,
    pub accession_number: String,
    pub xbrl_sequence: i32,
    pub xbrl_file: String,
    pub xbrl_type: String,
    pub xbrl_size: i64,
    pub xbrl_description: String,
    pub xbrl_inline: bool,
    pub xbrl_url: String,
    pub xbrl_body: String,
    pub xbrl_path: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<FilingFileRecord> for FilingFile {
    fn from(r: FilingFileRecord) -> Self {
        Self {
            id: r.id,
            company_name: r.company_name,
            form_type: r.form_type,
            filing_date: r.filing_date,
            cik_number: r.cik_number,
            accession_number: r.accession_number,
            sequence: r.xbrl_sequence,
            file: r.xbrl_file,
            file_type: r.xbrl_type,
            size: r.xbrl_size,
            description: r.xbrl_description,
            inline_xbrl: r.xbrl_inline,
            url: r.xbrl_url,
            body: r.xbrl_body,
            path: r.xbrl_path,
            created_at: parse_datetime(&r.created_at),
            updated_at: parse_datetime(&r.updated_at),
        }
    }
}

/// Every `filing_files` column an upsert may overwrite.
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = schema::filing_files)]
pub struct FilingFileChanges<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub guid: &'a str,
    pub enclosure_url: &'a str,
    pub enclosure_length: i64,
    pub enclosure_type: &'a str,
    pub description: &'a str,
    pub pub_date: &'a str,
    pub company_name: &'a str,
    pub form_type: &'a str,
    pub filing_date: &'a str,
    pub cik_number: i64,
    pub accession_number: &'a str,
    pub file_number: &'a str,
    pub acceptance_datetime: &'a str,
    pub period: &'a str,
    pub assistant_director: &'a str,
    pub assigned_sic: i32,
    pub fiscal_year_end: i32,
    pub xbrl_sequence: i32,
    pub xbrl_file: &'a str,
    pub xbrl_type: &'a str,
    pub xbrl_size: i64,
    pub xbrl_description: &'a str,
    pub xbrl_inline: bool,
    pub xbrl_url: &'a str,
    pub xbrl_body: &'a str,
    pub xbrl_path: &'a str,
    pub updated_at: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::filing_files)]
pub struct NewFilingFile<'a> {
    #[diesel(embed)]
    pub changes: FilingFileChanges<'a>,
    pub created_at: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::filing_zip_files)]
pub struct NewFilingZipFile<'a> {
    pub cik_number: i64,
    pub accession_number: &'a str,
    pub xbrl_file: &'a str,
    pub xbrl_size: i64,
    pub xbrl_body: &'a str,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::ciks)]
pub struct NewCik<'a> {
    pub cik: i64,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::tickers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TickerRecord {
    pub cik: i64,
    pub ticker: String,
    pub title: String,
    pub exchange: String,
}

impl From<TickerRecord> for Ticker {
    fn from(r: TickerRecord) -> Self {
        Self {
            cik: r.cik,
            ticker: r.ticker,
            title: r.title,
            exchange: r.exchange,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::tickers)]
pub struct NewTicker<'a> {
    pub cik: i64,
    pub ticker: &'a str,
    pub title: &'a str,
    pub exchange: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

