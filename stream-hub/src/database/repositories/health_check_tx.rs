//! Transactional operations for health checks.

use sqlx::SqliteConnection;

use crate::Result;
use crate::database::models::HealthCheckDbModel;

pub struct HealthCheckTxOps;

impl HealthCheckTxOps {
    /// Insert a health check row within the caller's transaction.
    pub async fn insert(tx: &mut SqliteConnection, check: &HealthCheckDbModel) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO health_checks (
                id, stream_id, status, bitrate_kbps, dropped_frames,
                buffer_secs, latency_ms, checked_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&check.id)
        .bind(&check.stream_id)
        .bind(&check.status)
        .bind(check.bitrate_kbps)
        .bind(check.dropped_frames)
        .bind(check.buffer_secs)
        .bind(check.latency_ms)
        .bind(check.checked_at)
        .execute(tx)
        .await?;
        Ok(())
    }
}
