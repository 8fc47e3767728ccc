//! Transactional operations for streams.
//!
//! These run inside a transaction the caller already opened and never
//! commit. Every status write is a compare-and-swap on `version`; a return
//! value of `0` rows means the row is gone or was modified concurrently.

use sqlx::SqliteConnection;

use crate::Result;

pub struct StreamTxOps;

impl StreamTxOps {
    /// Set `running`, stamp `started_at` and clear `stopped_at`.
    pub async fn set_running(
        tx: &mut SqliteConnection,
        stream_id: &str,
        expected_version: i64,
        started_at: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE streams
            SET status = 'running',
                started_at = ?,
                stopped_at = NULL,
                version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(started_at)
        .bind(stream_id)
        .bind(expected_version)
        .execute(tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set `stopped` and stamp `stopped_at`.
    pub async fn set_stopped(
        tx: &mut SqliteConnection,
        stream_id: &str,
        expected_version: i64,
        stopped_at: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE streams
            SET status = 'stopped',
                stopped_at = ?,
                version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(stopped_at)
        .bind(stream_id)
        .bind(expected_version)
        .execute(tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Move between active statuses without touching timestamps.
    pub async fn set_status(
        tx: &mut SqliteConnection,
        stream_id: &str,
        expected_version: i64,
        status: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE streams SET status = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(status)
        .bind(stream_id)
        .bind(expected_version)
        .execute(tx)
        .await?;

        Ok(result.rows_affected())
    }
}
