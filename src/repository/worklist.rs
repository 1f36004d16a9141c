//! Worklist of (year, month) partitions selected for download.

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::models::{NewWorklistEntry, WorklistRecord};
use super::pool::{DbPool, DieselError};
use super::util::now_rfc3339;
use crate::models::{Order, WorklistEntry};
use crate::schema::worklist;
use crate::with_conn;

#[derive(Clone)]
pub struct WorklistRepository {
    pool: DbPool,
}

impl WorklistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Upsert the flag for one month, or all twelve when `month == 0`.
    ///
    /// Whether the archive actually has data for a month is the caller's
    /// concern; see [`crate::services::schedule`].
    pub async fn set_downloadable(
        &self,
        year: i32,
        month: u32,
        will_download: bool,
    ) -> Result<(), DieselError> {
        let months: Vec<i32> = if month == 0 {
            (1..=12).collect()
        } else {
            vec![month as i32]
        };
        self.set_months(year, &months, will_download).await
    }

    /// Upsert the flag for an explicit set of months in one transaction.
    pub async fn set_months(
        &self,
        year: i32,
        months: &[i32],
        will_download: bool,
    ) -> Result<(), DieselError> {
        let now = now_rfc3339();

        with_conn!(self.pool, conn => {
            conn.transaction(|conn| {
                Box::pin(async move {
                    for &month in months {
                        diesel::insert_into(worklist::table)
                            .values(&NewWorklistEntry {
                                year,
                                month,
                                will_download,
                                updated_at: &now,
                            })
                            .on_conflict((worklist::year, worklist::month))
                            .do_update()
                            .set((
                                worklist::will_download.eq(will_download),
                                worklist::updated_at.eq(&now),
                            ))
                            .execute(conn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await
        })
    }

    /// Partitions flagged for download.
    pub async fn list_downloadable(&self, order: Order) -> Result<Vec<WorklistEntry>, DieselError> {
        let query = worklist::table
            .filter(worklist::will_download.eq(true))
            .select(WorklistRecord::as_select());

        let records: Vec<WorklistRecord> = with_conn!(self.pool, conn => {
            match order {
                Order::Ascending => {
                    query
                        .order((worklist::year.asc(), worklist::month.asc()))
                        .load(&mut conn)
                        .await
                }
                Order::Descending => {
                    query
                        .order((worklist::year.desc(), worklist::month.desc()))
                        .load(&mut conn)
                        .await
                }
            }
        })?;

        Ok(records.into_iter().map(WorklistEntry::from).collect())
    }

    pub async fn get(&self, year: i32, month: u32) -> Result<Option<WorklistEntry>, DieselError> {
        let record: Option<WorklistRecord> = with_conn!(self.pool, conn => {
            worklist::table
                .find((year, month as i32))
                .select(WorklistRecord::as_select())
                .first(&mut conn)
                .await
                .optional()
        })?;
        Ok(record.map(WorklistEntry::from))
    }

    /// Years that have at least one worklist row, ascending.
    pub async fn unique_years(&self) -> Result<Vec<i32>, DieselError> {
        with_conn!(self.pool, conn => {
            worklist::table
                .select(worklist::year)
                .distinct()
                .order(worklist::year.asc())
                .load::<i32>(&mut conn)
                .await
        })
    }

    pub async fn months_in_year(&self, year: i32) -> Result<Vec<WorklistEntry>, DieselError> {
        let records: Vec<WorklistRecord> = with_conn!(self.pool, conn => {
            worklist::table
                .filter(worklist::year.eq(year))
                .order(worklist::month.asc())
                .select(WorklistRecord::as_select())
                .load(&mut conn)
                .await
        })?;
        Ok(records.into_iter().map(WorklistEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::DbContext;

    async fn setup() -> (tempfile::TempDir, WorklistRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("edgar.db");
        let db = DbContext::from_url(db_path.to_str().unwrap()).unwrap();
        db.migrate().await.unwrap();
        (dir, db.worklist())
    }

    #[tokio::test]
    async fn test_whole_year_writes_twelve_months() {
        let (_dir, repo) = setup().await;
        repo.set_downloadable(2003, 0, true).await.unwrap();

        let months = repo.months_in_year(2003).await.unwrap();
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.will_download));
        assert_eq!(months[0].month, 1);
        assert_eq!(months[11].month, 12);
    }

    #[tokio::test]
    async fn test_upsert_refreshes_flag() {
        let (_dir, repo) = setup().await;
        repo.set_downloadable(2021, 5, true).await.unwrap();
        repo.set_downloadable(2021, 5, false).await.unwrap();

        let entry = repo.get(2021, 5).await.unwrap().unwrap();
        assert!(!entry.will_download);
        assert!(repo.list_downloadable(Order::Ascending).await.unwrap().is_empty());
        assert_eq!(repo.months_in_year(2021).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_order_and_years() {
        let (_dir, repo) = setup().await;
        repo.set_downloadable(2020, 12, true).await.unwrap();
        repo.set_downloadable(2021, 2, true).await.unwrap();
        repo.set_downloadable(2021, 1, true).await.unwrap();

        let asc: Vec<(i32, u32)> = repo
            .list_downloadable(Order::Ascending)
            .await
            .unwrap()
            .iter()
            .map(|e| (e.year, e.month))
            .collect();
        assert_eq!(asc, vec![(2020, 12), (2021, 1), (2021, 2)]);

        let desc = repo.list_downloadable(Order::Descending).await.unwrap();
        assert_eq!((desc[0].year, desc[0].month), (2021, 2));

        assert_eq!(repo.unique_years().await.unwrap(), vec![2020, 2021]);
    }
}
