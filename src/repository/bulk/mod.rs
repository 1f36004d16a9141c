//! Inserts for the quarterly bulk datasets.
//!
//! Published quarters never change, so every insert is `ON CONFLICT DO
//! NOTHING` on the table's natural key and re-indexing a quarter is a no-op.
//! Each call writes one chunk of rows in a single transaction.

mod rows;

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::de::DeserializeOwned;

pub use rows::{FsdsNum, FsdsPre, FsdsSub, FsdsTag, MfdCal, MfdLab, MfdNum, MfdSub, MfdTag, MfdTxt};

use super::pool::{DbPool, DieselError};
use crate::schema::{
    fsds_num, fsds_pre, fsds_sub, fsds_tag, mfd_cal, mfd_lab, mfd_num, mfd_sub, mfd_tag, mfd_txt,
};
use crate::with_conn;

/// (tag, version) pairs already confirmed present in a tag table.
pub type KnownTags = HashSet<(String, String)>;

/// A row of one bulk table: how it is inserted and counted.
///
/// Parent rows (`sub`, `tag`) carry a lower `LOAD_ORDER` than the rows that
/// reference them.
#[async_trait]
pub trait BulkRow: DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;
    const LOAD_ORDER: u8;

    /// Insert one chunk in a single transaction. Returns the rows written.
    async fn insert(
        repo: &BulkRepository,
        rows: &[Self],
        known: &mut KnownTags,
    ) -> Result<usize, DieselError>;

    async fn count(repo: &BulkRepository) -> Result<i64, DieselError>;
}

macro_rules! insert_ignore {
    ($row:ty, $table:ident, $order:expr) => {
        #[async_trait]
        impl BulkRow for $row {
            const TABLE: &'static str = stringify!($table);
            const LOAD_ORDER: u8 = $order;

            async fn insert(
                repo: &BulkRepository,
                rows: &[Self],
                _known: &mut KnownTags,
            ) -> Result<usize, DieselError> {
                with_conn!(repo.pool, conn => {
                    conn.transaction(|conn| {
                        Box::pin(async move {
                            let mut inserted = 0;
                            for row in rows {
                                inserted += diesel::insert_into($table::table)
                                    .values(row)
                                    .on_conflict_do_nothing()
                                    .execute(conn)
                                    .await?;
                            }
                            Ok(inserted)
                        })
                    })
                    .await
                })
            }

            async fn count(repo: &BulkRepository) -> Result<i64, DieselError> {
                with_conn!(repo.pool, conn => {
                    $table::table.count().get_result(&mut conn).await
                })
            }
        }
    };
}

/// Like `insert_ignore!`, but rows whose (tag, version) is missing from the
/// product's tag table are dropped.
macro_rules! insert_ignore_with_tag {
    ($row:ty, $table:ident, $tags:ident) => {
        #[async_trait]
        impl BulkRow for $row {
            const TABLE: &'static str = stringify!($table);
            const LOAD_ORDER: u8 = 2;

            async fn insert(
                repo: &BulkRepository,
                rows: &[Self],
                known: &mut KnownTags,
            ) -> Result<usize, DieselError> {
                with_conn!(repo.pool, conn => {
                    conn.transaction(|conn| {
                        Box::pin(async move {
                            let mut inserted = 0;
                            for row in rows {
                                let key = (row.tag.clone(), row.version.clone());
                                if !known.contains(&key) {
                                    let present: bool = diesel::select(diesel::dsl::exists(
                                        $tags::table
                                            .filter($tags::tag.eq(&row.tag))
                                            .filter($tags::version.eq(&row.version)),
                                    ))
                                    .get_result(conn)
                                    .await?;
                                    if !present {
                                        continue;
                                    }
                                    known.insert(key);
                                }
                                inserted += diesel::insert_into($table::table)
                                    .values(row)
                                    .on_conflict_do_nothing()
                                    .execute(conn)
                                    .await?;
                            }
                            Ok(inserted)
                        })
                    })
                    .await
                })
            }

            async fn count(repo: &BulkRepository) -> Result<i64, DieselError> {
                with_conn!(repo.pool, conn => {
                    $table::table.count().get_result(&mut conn).await
                })
            }
        }
    };
}

#[derive(Clone)]
pub struct BulkRepository {
    pool: DbPool,
}

impl BulkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn insert<R: BulkRow>(
        &self,
        rows: &[R],
        known: &mut KnownTags,
    ) -> Result<usize, DieselError> {
        R::insert(self, rows, known).await
    }

    pub async fn count<R: BulkRow>(&self) -> Result<i64, DieselError> {
        R::count(self).await
    }
}

insert_ignore!(FsdsSub, fsds_sub, 0);
insert_ignore!(FsdsTag, fsds_tag, 1);
insert_ignore_with_tag!(FsdsNum, fsds_num, fsds_tag);
insert_ignore_with_tag!(FsdsPre, fsds_pre, fsds_tag);

insert_ignore!(MfdSub, mfd_sub, 0);
insert_ignore!(MfdTag, mfd_tag, 1);
insert_ignore!(MfdLab, mfd_lab, 2);
insert_ignore!(MfdCal, mfd_cal, 2);
insert_ignore_with_tag!(MfdNum, mfd_num, mfd_tag);
insert_ignore_with_tag!(MfdTxt, mfd_txt, mfd_tag);
