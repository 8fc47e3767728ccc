//! Segment database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `segments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SegmentDbModel {
    pub id: String,
    pub stream_id: String,
    pub sequence: i64,
    pub url: String,
    pub duration_secs: f64,
    pub created_at: i64,
}
