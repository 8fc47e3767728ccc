//! Health monitor.
//!
//! Classifies reported samples against [`HealthThresholds`], persists them
//! and, for started streams, lets the classification drive the stream's
//! status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::database::repositories::{HealthCheckRepository, StatusUpdate, StreamRepository};
use crate::database::time::now;
use crate::domain::{
    HealthCheck, HealthMetrics, HealthSample, HealthStatus, HealthThresholds, Stream, StreamStatus,
};
use crate::{Error, Result};

/// Result of a recorded health sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub stream_id: String,
    pub status: HealthStatus,
    pub checked_at: DateTime<Utc>,
    pub metrics: HealthMetrics,
    /// Stream status after the sample was applied.
    pub stream_status: StreamStatus,
}

pub struct HealthMonitor<S, H>
where
    S: StreamRepository + Send + Sync,
    H: HealthCheckRepository + Send + Sync,
{
    streams: Arc<S>,
    checks: Arc<H>,
    thresholds: HealthThresholds,
    drives_status: bool,
}

impl<S, H> HealthMonitor<S, H>
where
    S: StreamRepository + Send + Sync,
    H: HealthCheckRepository + Send + Sync,
{
    pub fn new(
        streams: Arc<S>,
        checks: Arc<H>,
        thresholds: HealthThresholds,
        drives_status: bool,
    ) -> Self {
        Self {
            streams,
            checks,
            thresholds,
            drives_status,
        }
    }

    /// Status an active stream should move to after `status`, if any.
    fn next_stream_status(&self, stream: &Stream, status: HealthStatus) -> Option<StreamStatus> {
        if !self.drives_status || !stream.status.is_active() {
            return None;
        }
        let target = status.stream_status();
        (target != stream.status && stream.status.can_transition_to(target)).then_some(target)
    }

    /// Classify and persist a sample for `stream_id`.
    #[instrument(skip(self, sample))]
    pub async fn report(&self, stream_id: &str, sample: HealthSample) -> Result<HealthReport> {
        sample.validate()?;
        let stream = Stream::from_db_model(&self.streams.get_stream(stream_id).await?)?;

        let metrics = HealthMetrics {
            bitrate_kbps: sample.bitrate_kbps.unwrap_or(stream.bitrate_kbps),
            dropped_frames: sample.dropped_frames,
            buffer_secs: sample.buffer_secs,
            latency_ms: sample.latency_ms,
        };
        let status = self
            .thresholds
            .classify(metrics.dropped_frames, metrics.latency_ms);
        let check = HealthCheck::new(stream_id, status, metrics, now());

        let next = self.next_stream_status(&stream, status);
        let update = next.map(|target| StatusUpdate {
            status: target.as_str().to_string(),
            expected_version: stream.version,
        });

        let applied = self
            .checks
            .record_health_check(&check.to_db_model(), update.as_ref())
            .await?;
        if !applied {
            return Err(Error::conflict("Stream", stream_id));
        }

        match next {
            Some(target) => log_transition(stream_id, stream.status, target),
            None => debug!(stream_id = %stream_id, status = %status, "Health sample recorded"),
        }

        Ok(HealthReport {
            stream_id: stream_id.to_string(),
            status,
            checked_at: check.checked_at,
            metrics,
            stream_status: next.unwrap_or(stream.status),
        })
    }

    /// Samples for `stream_id`, most recent first. Unknown ids yield an
    /// empty list.
    pub async fn history(&self, stream_id: &str, limit: i64) -> Result<Vec<HealthCheck>> {
        if limit < 1 {
            return Err(Error::validation(format!(
                "history limit must be at least 1, got {}",
                limit
            )));
        }
        let models = self.checks.list_for_stream(stream_id, limit).await?;
        models.iter().map(HealthCheck::from_db_model).collect()
    }
}

fn log_transition(stream_id: &str, from: StreamStatus, to: StreamStatus) {
    if to == StreamStatus::Running {
        debug!(stream_id = %stream_id, from = %from, to = %to, "Stream recovered");
    } else {
        warn!(stream_id = %stream_id, from = %from, to = %to, "Stream health changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::{SqlxHealthCheckRepository, SqlxStreamRepository};
    use crate::database::{init_pool, run_migrations};
    use crate::domain::Protocol;

    async fn monitor(
        drives_status: bool,
    ) -> HealthMonitor<SqlxStreamRepository, SqlxHealthCheckRepository> {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        HealthMonitor::new(
            Arc::new(SqlxStreamRepository::new(pool.clone())),
            Arc::new(SqlxHealthCheckRepository::new(pool)),
            HealthThresholds::default(),
            drives_status,
        )
    }

    #[tokio::test]
    async fn test_next_status_only_for_active_streams() {
        let monitor = monitor(true).await;
        let mut stream = Stream::new("cam", "", "", Protocol::Hls, 1000);

        assert_eq!(monitor.next_stream_status(&stream, HealthStatus::Critical), None);

        stream.status = StreamStatus::Running;
        assert_eq!(
            monitor.next_stream_status(&stream, HealthStatus::Critical),
            Some(StreamStatus::Error)
        );
        assert_eq!(monitor.next_stream_status(&stream, HealthStatus::Healthy), None);

        stream.status = StreamStatus::Buffering;
        assert_eq!(
            monitor.next_stream_status(&stream, HealthStatus::Healthy),
            Some(StreamStatus::Running)
        );
    }

    #[tokio::test]
    async fn test_disabled_status_driving() {
        let monitor = monitor(false).await;
        let mut stream = Stream::new("cam", "", "", Protocol::Hls, 1000);
        stream.status = StreamStatus::Running;
        assert_eq!(monitor.next_stream_status(&stream, HealthStatus::Critical), None);
    }

    #[tokio::test]
    async fn test_history_rejects_zero_limit() {
        let monitor = monitor(true).await;
        let err = monitor.history("anything", 0).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
        assert!(monitor.history("anything", 5).await.unwrap().is_empty());
    }
}
