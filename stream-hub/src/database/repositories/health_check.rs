//! Health check repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::health_check_tx::HealthCheckTxOps;
use super::stream_tx::StreamTxOps;
use crate::database::models::{HealthCheckDbModel, RecentHealthRow};
use crate::database::retry::retry_on_sqlite_busy;
use crate::database::{DbPool, begin_immediate};
use crate::Result;

/// Stream status write applied together with a health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: String,
    pub expected_version: i64,
}

/// Health check repository trait.
#[async_trait]
pub trait HealthCheckRepository: Send + Sync {
    /// Insert `check` and, when given, apply `update` to the owning stream
    /// in the same transaction.
    ///
    /// Returns `false` without writing anything if the stream's version no
    /// longer matches `update.expected_version`.
    async fn record_health_check(
        &self,
        check: &HealthCheckDbModel,
        update: Option<&StatusUpdate>,
    ) -> Result<bool>;

    /// Checks for one stream, most recent first.
    async fn list_for_stream(&self, stream_id: &str, limit: i64)
    -> Result<Vec<HealthCheckDbModel>>;

    /// Most recent checks across all streams, joined with the stream name.
    async fn list_recent(&self, limit: i64) -> Result<Vec<RecentHealthRow>>;
}

/// SQLx implementation of HealthCheckRepository.
pub struct SqlxHealthCheckRepository {
    pool: SqlitePool,
}

impl SqlxHealthCheckRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn try_record(
        pool: &DbPool,
        check: &HealthCheckDbModel,
        update: Option<&StatusUpdate>,
    ) -> Result<bool> {
        let mut tx = begin_immediate(pool).await?;

        if let Some(update) = update {
            let updated = StreamTxOps::set_status(
                &mut tx,
                &check.stream_id,
                update.expected_version,
                &update.status,
            )
            .await?;
            if updated == 0 {
                tx.rollback().await?;
                return Ok(false);
            }
        }
        HealthCheckTxOps::insert(&mut tx, check).await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl HealthCheckRepository for SqlxHealthCheckRepository {
    async fn record_health_check(
        &self,
        check: &HealthCheckDbModel,
        update: Option<&StatusUpdate>,
    ) -> Result<bool> {
        let pool = &self.pool;
        retry_on_sqlite_busy("record_health_check", move || {
            Self::try_record(pool, check, update)
        })
        .await
    }

    async fn list_for_stream(
        &self,
        stream_id: &str,
        limit: i64,
    ) -> Result<Vec<HealthCheckDbModel>> {
        let checks = sqlx::query_as::<_, HealthCheckDbModel>(
            r#"
            SELECT * FROM health_checks
            WHERE stream_id = ?
            ORDER BY checked_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(stream_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(checks)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RecentHealthRow>> {
        let rows = sqlx::query_as::<_, RecentHealthRow>(
            r#"
            SELECT hc.stream_id, s.name AS stream_name, hc.status, hc.bitrate_kbps,
                   hc.dropped_frames, hc.latency_ms, hc.checked_at
            FROM health_checks hc
            JOIN streams s ON s.id = hc.stream_id
            ORDER BY hc.checked_at DESC, hc.rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
