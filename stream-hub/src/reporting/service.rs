//! Reporting service.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{GroupCountRow, RecentHealthRow};
use crate::database::repositories::{HealthCheckRepository, StreamRepository};
use crate::database::time::ms_to_datetime;
use crate::domain::{Stream, StreamStatus};
use crate::Result;

/// A recent health sample joined with its stream's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentHealth {
    pub stream_id: String,
    pub stream_name: String,
    pub status: String,
    pub bitrate_kbps: i64,
    pub dropped_frames: i64,
    pub latency_ms: i64,
    pub checked_at: DateTime<Utc>,
}

impl From<RecentHealthRow> for RecentHealth {
    fn from(row: RecentHealthRow) -> Self {
        Self {
            stream_id: row.stream_id,
            stream_name: row.stream_name,
            status: row.status,
            bitrate_kbps: row.bitrate_kbps,
            dropped_frames: row.dropped_frames,
            latency_ms: row.latency_ms,
            checked_at: ms_to_datetime(row.checked_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_streams: i64,
    /// Only statuses with at least one stream appear.
    pub by_status: BTreeMap<String, i64>,
    pub by_protocol: BTreeMap<String, i64>,
    pub recent_health: Vec<RecentHealth>,
}

fn into_map(rows: Vec<GroupCountRow>) -> BTreeMap<String, i64> {
    rows.into_iter().map(|row| (row.key, row.count)).collect()
}

pub struct ReportingService<S, H>
where
    S: StreamRepository + Send + Sync,
    H: HealthCheckRepository + Send + Sync,
{
    streams: Arc<S>,
    checks: Arc<H>,
    recent_health_limit: i64,
}

impl<S, H> ReportingService<S, H>
where
    S: StreamRepository + Send + Sync,
    H: HealthCheckRepository + Send + Sync,
{
    pub fn new(streams: Arc<S>, checks: Arc<H>, recent_health_limit: i64) -> Self {
        Self {
            streams,
            checks,
            recent_health_limit,
        }
    }

    pub async fn stats(&self) -> Result<StatsSnapshot> {
        let total_streams = self.streams.count_streams().await?;
        let by_status = into_map(self.streams.count_by_status().await?);
        let by_protocol = into_map(self.streams.count_by_protocol().await?);
        let recent_health = self
            .checks
            .list_recent(self.recent_health_limit)
            .await?
            .into_iter()
            .map(RecentHealth::from)
            .collect();

        Ok(StatsSnapshot {
            total_streams,
            by_status,
            by_protocol,
            recent_health,
        })
    }

    /// Streams newest first, optionally restricted to one status.
    pub async fn list(&self, status: Option<StreamStatus>) -> Result<Vec<Stream>> {
        let models = match status {
            Some(status) => self.streams.list_streams_by_status(status.as_str()).await?,
            None => self.streams.list_streams().await?,
        };
        models.iter().map(Stream::from_db_model).collect()
    }

    /// Started streams whatever their current health, newest first.
    pub async fn list_active(&self) -> Result<Vec<Stream>> {
        let models = self.streams.list_active_streams().await?;
        models.iter().map(Stream::from_db_model).collect()
    }
}
