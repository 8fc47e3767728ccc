//! Stream database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `streams` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StreamDbModel {
    pub id: String,
    pub name: String,
    pub source_url: String,
    pub target_url: String,
    /// hls, rtmp, dash or srt
    pub protocol: String,
    pub bitrate_kbps: i64,
    /// stopped, running, error or buffering
    pub status: String,
    /// JSON encoded `StreamConfig`.
    pub config: String,
    pub created_at: i64,
    pub started_at: Option<i64>,
    pub stopped_at: Option<i64>,
    pub version: i64,
}

/// Row of a `GROUP BY` count query.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct GroupCountRow {
    pub key: String,
    pub count: i64,
}
