//! Tab-separated bulk files into their tables, one chunk per transaction.

use std::fs::File;
use std::marker::PhantomData;

use async_trait::async_trait;
use csv::{ByteRecord, Reader, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;

use crate::error::BulkError;
use crate::repository::bulk::{BulkRow, KnownTags};
use crate::repository::{BulkRepository, DieselError};

pub const CHUNK_SIZE: usize = 1000;

/// Tab-delimited, ragged rows allowed, quotes taken literally.
pub fn reader(file: File) -> Reader<File> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .has_headers(true)
        .from_reader(file)
}

/// Header row, lowercased and without a byte order mark.
pub fn lowercase_headers(reader: &mut Reader<File>) -> Result<StringRecord, csv::Error> {
    let raw = reader.byte_headers()?.clone();
    Ok(StringRecord::from_byte_record_lossy(raw)
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect())
}

/// Up to [`CHUNK_SIZE`] rows; empty at end of file. Short rows are padded
/// with empty fields and invalid UTF-8 is replaced rather than rejected.
pub fn next_chunk<R: DeserializeOwned>(
    reader: &mut Reader<File>,
    headers: &StringRecord,
) -> Result<Vec<R>, csv::Error> {
    let mut rows = Vec::with_capacity(CHUNK_SIZE);
    let mut raw = ByteRecord::new();
    while rows.len() < CHUNK_SIZE && reader.read_byte_record(&mut raw)? {
        let mut record = StringRecord::from_byte_record_lossy(raw.clone());
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize(Some(headers))?);
    }
    Ok(rows)
}

/// Load every row of one spooled file. Returns the rows written.
pub async fn load_rows<R: BulkRow>(
    repo: &BulkRepository,
    file: File,
    known: &mut KnownTags,
) -> Result<usize, BulkError> {
    let mut reader = reader(file);
    let headers = lowercase_headers(&mut reader)?;
    let mut inserted = 0;
    loop {
        let chunk: Vec<R> = next_chunk(&mut reader, &headers)?;
        if chunk.is_empty() {
            break;
        }
        inserted += repo.insert(&chunk, known).await?;
    }
    Ok(inserted)
}

/// Loads one file of a bulk ZIP into its table.
#[async_trait]
pub trait BulkLoader: Send + Sync {
    fn table(&self) -> &'static str;

    /// Lower loads first.
    fn load_order(&self) -> u8;

    async fn load(
        &self,
        repo: &BulkRepository,
        file: File,
        known: &mut KnownTags,
    ) -> Result<usize, BulkError>;

    async fn count(&self, repo: &BulkRepository) -> Result<i64, DieselError>;
}

/// [`BulkLoader`] for the table behind a row type.
pub struct TableLoader<R>(PhantomData<fn() -> R>);

impl<R> TableLoader<R> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for TableLoader<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: BulkRow> BulkLoader for TableLoader<R> {
    fn table(&self) -> &'static str {
        R::TABLE
    }

    fn load_order(&self) -> u8 {
        R::LOAD_ORDER
    }

    async fn load(
        &self,
        repo: &BulkRepository,
        file: File,
        known: &mut KnownTags,
    ) -> Result<usize, BulkError> {
        load_rows::<R>(repo, file, known).await
    }

    async fn count(&self, repo: &BulkRepository) -> Result<i64, DieselError> {
        repo.count::<R>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::bulk::{FsdsSub, FsdsTag, MfdTag};
    use std::io::{Seek, SeekFrom, Write};

    fn spool(contents: &[u8]) -> File {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        file
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut r = reader(spool(b"\xef\xbb\xbfTag\tVersion\tTLABEL\nAssets\tus-gaap/2021\tAssets\n"));
        let headers = lowercase_headers(&mut r).unwrap();
        assert_eq!(headers, vec!["tag", "version", "tlabel"]);

        let rows: Vec<FsdsTag> = next_chunk(&mut r, &headers).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, "Assets");
        assert_eq!(rows[0].tlabel, "Assets");
    }

    #[test]
    fn test_ragged_rows_and_literal_quotes() {
        let mut r = reader(spool(
            b"adsh\tcik\tname\tsic\n0000-1\t42\t\"ACME\" CORP\n0000-2\t43\tB\t1000\textra\n",
        ));
        let headers = lowercase_headers(&mut r).unwrap();
        let rows: Vec<FsdsSub> = next_chunk(&mut r, &headers).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "\"ACME\" CORP");
        assert_eq!(rows[0].sic, "");
        assert_eq!(rows[1].cik, 43);
    }

    #[test]
    fn test_malformed_integer_is_fatal() {
        let mut r = reader(spool(b"adsh\tcik\n0000-1\tforty-two\n"));
        let headers = lowercase_headers(&mut r).unwrap();
        assert!(next_chunk::<FsdsSub>(&mut r, &headers).is_err());
    }

    #[test]
    fn test_chunking() {
        let mut body = b"tag\tversion\n".to_vec();
        for i in 0..(CHUNK_SIZE + 5) {
            body.extend_from_slice(format!("T{i}\tv1\n").as_bytes());
        }
        let mut r = reader(spool(&body));
        let headers = lowercase_headers(&mut r).unwrap();
        assert_eq!(next_chunk::<MfdTag>(&mut r, &headers).unwrap().len(), CHUNK_SIZE);
        assert_eq!(next_chunk::<MfdTag>(&mut r, &headers).unwrap().len(), 5);
        assert!(next_chunk::<MfdTag>(&mut r, &headers).unwrap().is_empty());
    }
}
