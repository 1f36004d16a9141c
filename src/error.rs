//! Error types for the pipeline stages.

use thiserror::Error;

use crate::repository::DieselError;

/// Errors from fetching a URL into the cache.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("no ETag for {url} after {attempts} attempts")]
    MissingEtag { url: String, attempts: u32 },

    #[error("no Content-Length for {url} after {attempts} attempts")]
    MissingContentLength { url: String, attempts: u32 },

    #[error("{0} served an error page: This page is temporarily unavailable.")]
    PageUnavailable(String),

    #[error("URL {0} has no path to cache under")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),
}

/// Errors from reading a monthly index feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported feed encoding: {0}")]
    UnknownEncoding(String),

    #[error("Feed is not valid {0}")]
    Decode(&'static str),

    #[error("Malformed feed XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Invalid {field} value {value:?}")]
    Field { field: &'static str, value: String },
}

/// Errors from downloading or loading a quarterly bulk dataset.
#[derive(Debug, Error)]
pub enum BulkError {
    #[error("could_not_identify_file_type_func {0}")]
    UnknownFileType(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed TSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),

    #[error("Invalid dataset URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors from indexing filing files.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(
        "{0} is missing, please run edgar download index to download all index files first"
    )]
    MissingIndex(String),

    #[error("zip file {0} does not exist")]
    MissingZip(String),

    #[error("Corrupt archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Malformed ticker file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("please enter a valid date ('2021' or '2021/05')")]
    Invalid,
}
