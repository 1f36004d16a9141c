//! edgarsync - incremental mirror and index of the SEC EDGAR XBRL archive.
//!
//! Monthly XBRL RSS feeds drive the pipeline: the feeds are downloaded,
//! the filings they list are fetched into a local cache, and their
//! contents are indexed into SQLite or PostgreSQL. Quarterly bulk data
//! sets are loaded alongside.

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod schema;
pub mod services;
pub mod utils;
