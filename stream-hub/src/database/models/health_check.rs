//! Health check database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `health_checks` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HealthCheckDbModel {
    pub id: String,
    pub stream_id: String,
    /// healthy, degraded, critical or running
    pub status: String,
    pub bitrate_kbps: i64,
    pub dropped_frames: i64,
    pub buffer_secs: f64,
    pub latency_ms: i64,
    pub checked_at: i64,
}

/// Health check joined with the owning stream's name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RecentHealthRow {
    pub stream_id: String,
    pub stream_name: String,
    pub status: String,
    pub bitrate_kbps: i64,
    pub dropped_frames: i64,
    pub latency_ms: i64,
    pub checked_at: i64,
}
