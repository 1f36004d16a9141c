//! Indexed filing files.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One file of a filing as stored in `filing_files`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingFile {
    pub id: i32,
    pub company_name: String,
    pub form_type: String,
    pub filing_date: String,
    pub cik_number: i64,
    pub accession_number: String,
    pub sequence: i32,
    pub file: String,
    pub file_type: String,
    pub size: i64,
    pub description: String,
    pub inline_xbrl: bool,
    pub url: String,
    pub body: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
