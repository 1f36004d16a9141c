//! Append-only event log and the stats computed from it.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use super::models::{EventRecord, NewEvent};
use super::parse_datetime;
use super::pool::{DbPool, DieselError};
use super::util::{now_rfc3339, to_diesel_error};
use crate::models::event::{self, Bucket, DownloadCounts, EventPayload, EventStats};
use crate::schema::events;
use crate::with_conn;

#[derive(Clone)]
pub struct EventRepository {
    pool: DbPool,
}

impl EventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, payload: &EventPayload) -> Result<(), DieselError> {
        let ev = payload.to_json().map_err(to_diesel_error)?;
        let now = now_rfc3339();

        with_conn!(self.pool, conn => {
            diesel::insert_into(events::table)
                .values(&NewEvent {
                    ev: &ev,
                    created_at: &now,
                })
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }

    /// Events created at or after `since`, oldest first. Rows that no
    /// longer parse are logged and left out.
    pub async fn since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(DateTime<Utc>, EventPayload)>, DieselError> {
        // RFC3339 UTC strings sort chronologically; "" admits every row.
        let lower = since
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .unwrap_or_default();

        let records: Vec<EventRecord> = with_conn!(self.pool, conn => {
            events::table
                .filter(events::created_at.ge(&lower))
                .order(events::id.asc())
                .select(EventRecord::as_select())
                .load(&mut conn)
                .await
        })?;

        Ok(records
            .into_iter()
            .filter_map(|r| match EventPayload::from_json(&r.ev) {
                Ok(payload) => Some((parse_datetime(&r.created_at), payload)),
                Err(e) => {
                    warn!("Skipping unreadable event {}: {}", r.id, e);
                    None
                }
            })
            .collect())
    }

    /// Per-day stats over the whole log, newest day first.
    pub async fn event_stats(&self) -> Result<Vec<EventStats>, DieselError> {
        let events = self.since(None).await?;
        Ok(event::aggregate(events.iter().map(|(t, e)| (t, e)), Bucket::Day))
    }

    pub async fn event_stats_by_hour(&self) -> Result<Vec<EventStats>, DieselError> {
        let events = self.since(None).await?;
        Ok(event::aggregate(events.iter().map(|(t, e)| (t, e)), Bucket::Hour))
    }

    /// Per-day stats for the last `days` days including today.
    pub async fn last_days(&self, days: u32) -> Result<Vec<EventStats>, DieselError> {
        let start = (Utc::now() - Duration::days(i64::from(days.saturating_sub(1))))
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc());
        let events = self.since(start).await?;
        Ok(event::aggregate(events.iter().map(|(t, e)| (t, e)), Bucket::Day))
    }

    pub async fn download_counts(&self) -> Result<DownloadCounts, DieselError> {
        let events = self.since(None).await?;
        Ok(event::download_counts(events.iter().map(|(_, e)| e)))
    }
}
