//! Company ticker files, loaded into `ciks` and `tickers`.
//!
//! `company_tickers.json` is an object of `{cik_str, ticker, title}` rows
//! keyed by position. `company_tickers_exchange.json` is a table with a
//! `fields` header and `data` rows that also carry the exchange; any cell
//! there may be null.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use url::Url;

use super::context::PipelineContext;
use crate::error::IndexError;
use crate::models::event::{reason, EventPayload};
use crate::models::Ticker;

pub const COMPANY_TICKERS: &str = "files/company_tickers.json";
pub const COMPANY_TICKERS_EXCHANGE: &str = "files/company_tickers_exchange.json";

/// Both files, in load order.
pub const TICKER_FILES: [&str; 2] = [COMPANY_TICKERS, COMPANY_TICKERS_EXCHANGE];

pub fn ticker_file_url(base: &Url, relative: &str) -> Result<Url, url::ParseError> {
    base.join(&format!("/{}", relative))
}

#[derive(Deserialize)]
struct CompanyTicker {
    cik_str: i64,
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    title: String,
}

pub fn parse_company_tickers(bytes: &[u8]) -> Result<Vec<Ticker>, serde_json::Error> {
    let rows: BTreeMap<u64, CompanyTicker> = serde_json::from_slice(bytes)?;
    Ok(rows
        .into_values()
        .map(|row| Ticker {
            cik: row.cik_str,
            ticker: row.ticker,
            title: row.title,
            exchange: String::new(),
        })
        .collect())
}

#[derive(Deserialize)]
struct ExchangeFile {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl ExchangeFile {
    /// Column of `name` in `fields`, or its usual position.
    fn column(&self, name: &str, fallback: usize) -> usize {
        self.fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(name))
            .unwrap_or(fallback)
    }
}

fn text(row: &[Value], column: usize) -> String {
    row.get(column)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn parse_exchange_file(bytes: &[u8]) -> Result<Vec<Ticker>, serde_json::Error> {
    let file: ExchangeFile = serde_json::from_slice(bytes)?;
    let cik = file.column("cik", 0);
    let name = file.column("name", 1);
    let ticker = file.column("ticker", 2);
    let exchange = file.column("exchange", 3);

    Ok(file
        .data
        .iter()
        .map(|row| Ticker {
            cik: row
                .get(cik)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or_default(),
            ticker: text(row, ticker),
            title: text(row, name),
            exchange: text(row, exchange),
        })
        .collect())
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickerResult {
    /// CIKs not seen before
    pub ciks: usize,
    /// Listings inserted, or given an exchange they lacked
    pub listings: usize,
}

type Parser = fn(&[u8]) -> Result<Vec<Ticker>, serde_json::Error>;

async fn load_file(
    ctx: &PipelineContext,
    path: &Path,
    parse: Parser,
    result: &mut TickerResult,
) -> Result<(), IndexError> {
    let file = path.display().to_string();
    let events = ctx.db.events();
    let repo = ctx.db.tickers();

    let listings = parse(&tokio::fs::read(path).await?)?;
    info!("Indexing file {} ({} listings)", file, listings.len());

    let mut numbers: Vec<i64> = listings.iter().map(|t| t.cik).collect();
    numbers.sort_unstable();
    numbers.dedup();

    match repo.save_ciks(&numbers).await {
        Ok(added) => result.ciks += added,
        Err(e) => {
            events
                .record(&EventPayload::index_failed(
                    &file,
                    reason::ERROR_INSERTING_CIK_IN_DATABASE,
                ))
                .await?;
            return Err(e.into());
        }
    }

    match repo.upsert(&listings).await {
        Ok(written) => result.listings += written,
        Err(e) => {
            events
                .record(&EventPayload::index_failed(
                    &file,
                    reason::ERROR_INSERTING_TICKER_IN_DATABASE,
                ))
                .await?;
            return Err(e.into());
        }
    }

    events.record(&EventPayload::index_success(&file)).await?;
    Ok(())
}

/// Load both cached ticker files. Either file missing from the cache is an
/// error telling the user to run `download index` first.
pub async fn update_all(ctx: &PipelineContext) -> Result<TickerResult, IndexError> {
    let paths = TICKER_FILES.map(|relative| ctx.cache_dir.join(relative));
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(IndexError::MissingIndex(missing.display().to_string()));
    }

    let mut result = TickerResult::default();
    let [tickers, exchange] = &paths;
    load_file(ctx, tickers, parse_company_tickers, &mut result).await?;
    load_file(ctx, exchange, parse_exchange_file, &mut result).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_tickers() {
        let json = br#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        let tickers = parse_company_tickers(json).unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[0].cik, 320193);
        assert_eq!(tickers[1].ticker, "MSFT");
        assert!(tickers.iter().all(|t| t.exchange.is_empty()));
    }

    #[test]
    fn test_parse_exchange_file_with_nulls() {
        let json = br#"{
            "fields": ["cik", "name", "ticker", "exchange"],
            "data": [
                [320193, "Apple Inc.", "AAPL", "Nasdaq"],
                [1067983, "BERKSHIRE HATHAWAY INC", "BRK-B", null],
                [null, null, "ZZZ", "OTC"]
            ]
        }"#;
        let tickers = parse_exchange_file(json).unwrap();
        assert_eq!(
            tickers[0],
            Ticker {
                cik: 320193,
                ticker: "AAPL".into(),
                title: "Apple Inc.".into(),
                exchange: "Nasdaq".into(),
            }
        );
        assert_eq!(tickers[1].exchange, "");
        assert_eq!(tickers[2].cik, 0);
        assert_eq!(tickers[2].title, "");
    }

    #[test]
    fn test_parse_exchange_file_follows_fields() {
        let json = br#"{"fields": ["ticker", "exchange", "cik", "name"], "data": [["AAPL", "Nasdaq", 320193, "Apple Inc."]]}"#;
        let tickers = parse_exchange_file(json).unwrap();
        assert_eq!(tickers[0].cik, 320193);
        assert_eq!(tickers[0].title, "Apple Inc.");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(parse_company_tickers(b"[1, 2").is_err());
        assert!(parse_exchange_file(b"{\"data\": 3}").is_err());
    }

    #[test]
    fn test_ticker_file_url() {
        let base = Url::parse("https://www.sec.gov").unwrap();
        assert_eq!(
            ticker_file_url(&base, COMPANY_TICKERS).unwrap().as_str(),
            "https://www.sec.gov/files/company_tickers.json"
        );
    }
}
