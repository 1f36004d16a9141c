//! Company tickers published by the archive.

use serde::Serialize;

/// One (cik, ticker, title) listing. `exchange` is empty when the source
/// file does not carry one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ticker {
    pub cik: i64,
    pub ticker: String,
    pub title: String,
    pub exchange: String,
}
