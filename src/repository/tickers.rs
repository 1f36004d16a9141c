//! Company CIKs and their ticker listings.

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::models::{NewCik, NewTicker, TickerRecord};
use super::pool::{DbPool, DieselError};
use super::util::now_rfc3339;
use crate::models::Ticker;
use crate::schema::{ciks, tickers};
use crate::with_conn;

#[derive(Clone)]
pub struct TickerRepository {
    pool: DbPool,
}

impl TickerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record every CIK not seen before. Returns the number added.
    pub async fn save_ciks(&self, numbers: &[i64]) -> Result<usize, DieselError> {
        let now = now_rfc3339();

        with_conn!(self.pool, conn => {
            conn.transaction(|conn| {
                Box::pin(async move {
                    let mut added = 0;
                    for &cik in numbers {
                        added += diesel::insert_into(ciks::table)
                            .values(&NewCik {
                                cik,
                                created_at: &now,
                                updated_at: &now,
                            })
                            .on_conflict(ciks::cik)
                            .do_nothing()
                            .execute(conn)
                            .await?;
                    }
                    Ok(added)
                })
            })
            .await
        })
    }

    /// Insert listings keyed on (cik, ticker, title). An existing listing
    /// only takes the exchange when it has none yet. Returns the rows
    /// inserted or filled in.
    pub async fn upsert(&self, listings: &[Ticker]) -> Result<usize, DieselError> {
        let now = now_rfc3339();

        with_conn!(self.pool, conn => {
            conn.transaction(|conn| {
                Box::pin(async move {
                    let mut written = 0;
                    for listing in listings {
                        let inserted = diesel::insert_into(tickers::table)
                            .values(&NewTicker {
                                cik: listing.cik,
                                ticker: &listing.ticker,
                                title: &listing.title,
                                exchange: &listing.exchange,
                                created_at: &now,
                                updated_at: &now,
                            })
                            .on_conflict((tickers::cik, tickers::ticker, tickers::title))
                            .do_nothing()
                            .execute(conn)
                            .await?;
                        if inserted > 0 {
                            written += inserted;
                            continue;
                        }
                        if listing.exchange.is_empty() {
                            continue;
                        }
                        written += diesel::update(
                            tickers::table
                                .filter(tickers::cik.eq(listing.cik))
                                .filter(tickers::ticker.eq(&listing.ticker))
                                .filter(tickers::title.eq(&listing.title))
                                .filter(tickers::exchange.eq("")),
                        )
                        .set((
                            tickers::exchange.eq(&listing.exchange),
                            tickers::updated_at.eq(&now),
                        ))
                        .execute(conn)
                        .await?;
                    }
                    Ok(written)
                })
            })
            .await
        })
    }

    pub async fn all(&self) -> Result<Vec<Ticker>, DieselError> {
        let records: Vec<TickerRecord> = with_conn!(self.pool, conn => {
            tickers::table
                .order((tickers::cik.asc(), tickers::ticker.asc()))
                .select(TickerRecord::as_select())
                .load(&mut conn)
                .await
        })?;
        Ok(records.into_iter().map(Ticker::from).collect())
    }

    pub async fn count_ciks(&self) -> Result<i64, DieselError> {
        with_conn!(self.pool, conn => {
            ciks::table.count().get_result(&mut conn).await
        })
    }
}
