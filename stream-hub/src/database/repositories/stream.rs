//! Stream repository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::health_check_tx::HealthCheckTxOps;
use super::stream_tx::StreamTxOps;
use crate::database::models::{GroupCountRow, HealthCheckDbModel, StreamDbModel};
use crate::database::retry::retry_on_sqlite_busy;
use crate::database::{DbPool, begin_immediate};
use crate::{Error, Result};

/// Stream repository trait.
#[async_trait]
pub trait StreamRepository: Send + Sync {
    async fn get_stream(&self, id: &str) -> Result<StreamDbModel>;
    async fn find_stream(&self, id: &str) -> Result<Option<StreamDbModel>>;
    /// Insert, or replace the row with the same id.
    async fn upsert_stream(&self, stream: &StreamDbModel) -> Result<()>;
    /// All streams, newest first.
    async fn list_streams(&self) -> Result<Vec<StreamDbModel>>;
    async fn list_streams_by_status(&self, status: &str) -> Result<Vec<StreamDbModel>>;
    /// Started streams (any status but `stopped`), newest first.
    async fn list_active_streams(&self) -> Result<Vec<StreamDbModel>>;
    async fn count_streams(&self) -> Result<i64>;
    async fn count_by_status(&self) -> Result<Vec<GroupCountRow>>;
    async fn count_by_protocol(&self) -> Result<Vec<GroupCountRow>>;

    /// Atomically move the stream to `running` and record the start sample.
    ///
    /// Returns `false` without writing anything when `expected_version` no
    /// longer matches.
    async fn mark_running(
        &self,
        id: &str,
        expected_version: i64,
        started_at: i64,
        initial_check: &HealthCheckDbModel,
    ) -> Result<bool>;

    /// Move the stream to `stopped`. Returns `false` on a version mismatch.
    async fn mark_stopped(&self, id: &str, expected_version: i64, stopped_at: i64) -> Result<bool>;
}

/// SQLx implementation of StreamRepository.
pub struct SqlxStreamRepository {
    pool: SqlitePool,
}

impl SqlxStreamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn try_mark_running(
        pool: &DbPool,
        id: &str,
        expected_version: i64,
        started_at: i64,
        initial_check: &HealthCheckDbModel,
    ) -> Result<bool> {
        let mut tx = begin_immediate(pool).await?;

        let updated = StreamTxOps::set_running(&mut tx, id, expected_version, started_at).await?;
        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        HealthCheckTxOps::insert(&mut tx, initial_check).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn try_mark_stopped(
        pool: &DbPool,
        id: &str,
        expected_version: i64,
        stopped_at: i64,
    ) -> Result<bool> {
        let mut tx = begin_immediate(pool).await?;

        let updated = StreamTxOps::set_stopped(&mut tx, id, expected_version, stopped_at).await?;
        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl StreamRepository for SqlxStreamRepository {
    async fn get_stream(&self, id: &str) -> Result<StreamDbModel> {
        self.find_stream(id)
            .await?
            .ok_or_else(|| Error::not_found("Stream", id))
    }

    async fn find_stream(&self, id: &str) -> Result<Option<StreamDbModel>> {
        let stream = sqlx::query_as::<_, StreamDbModel>("SELECT * FROM streams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stream)
    }

    async fn upsert_stream(&self, stream: &StreamDbModel) -> Result<()> {
        retry_on_sqlite_busy("upsert_stream", || async {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO streams (
                    id, name, source_url, target_url, protocol, bitrate_kbps,
                    status, config, created_at, started_at, stopped_at, version
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&stream.id)
            .bind(&stream.name)
            .bind(&stream.source_url)
            .bind(&stream.target_url)
            .bind(&stream.protocol)
            .bind(stream.bitrate_kbps)
            .bind(&stream.status)
            .bind(&stream.config)
            .bind(stream.created_at)
            .bind(stream.started_at)
            .bind(stream.stopped_at)
            .bind(stream.version)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await?;

        debug!(stream_id = %stream.id, "Stream row written");
        Ok(())
    }

    async fn list_streams(&self) -> Result<Vec<StreamDbModel>> {
        let streams = sqlx::query_as::<_, StreamDbModel>(
            "SELECT * FROM streams ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(streams)
    }

    async fn list_streams_by_status(&self, status: &str) -> Result<Vec<StreamDbModel>> {
        let streams = sqlx::query_as::<_, StreamDbModel>(
            "SELECT * FROM streams WHERE status = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(streams)
    }

    async fn list_active_streams(&self) -> Result<Vec<StreamDbModel>> {
        let streams = sqlx::query_as::<_, StreamDbModel>(
            "SELECT * FROM streams WHERE status != 'stopped' ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(streams)
    }

    async fn count_streams(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM streams")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self) -> Result<Vec<GroupCountRow>> {
        let rows = sqlx::query_as::<_, GroupCountRow>(
            "SELECT status AS key, COUNT(*) AS count FROM streams GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_protocol(&self) -> Result<Vec<GroupCountRow>> {
        let rows = sqlx::query_as::<_, GroupCountRow>(
            "SELECT protocol AS key, COUNT(*) AS count FROM streams GROUP BY protocol ORDER BY protocol",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_running(
        &self,
        id: &str,
        expected_version: i64,
        started_at: i64,
        initial_check: &HealthCheckDbModel,
    ) -> Result<bool> {
        let pool = &self.pool;
        retry_on_sqlite_busy("mark_running", move || {
            Self::try_mark_running(pool, id, expected_version, started_at, initial_check)
        })
        .await
    }

    async fn mark_stopped(&self, id: &str, expected_version: i64, stopped_at: i64) -> Result<bool> {
        let pool = &self.pool;
        retry_on_sqlite_busy("mark_stopped", move || {
            Self::try_mark_stopped(pool, id, expected_version, stopped_at)
        })
        .await
    }
}
