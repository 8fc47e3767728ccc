//! Stream manager implementation.
//!
//! Every status change goes through a compare-and-swap on the stream's
//! `version` column, so two callers racing on the same stream cannot both
//! win.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::database::repositories::StreamRepository;
use crate::database::time::{datetime_to_ms, now};
use crate::domain::{HealthCheck, HealthMetrics, HealthStatus, NewStream, Stream, StreamStatus};
use crate::{Error, Result};

/// Result of a successful start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartOutcome {
    pub stream_id: String,
    pub status: StreamStatus,
    pub started_at: DateTime<Utc>,
}

/// Result of a successful stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopOutcome {
    pub stream_id: String,
    pub status: StreamStatus,
    /// `None` only for a stream that was never started.
    pub stopped_at: Option<DateTime<Utc>>,
    /// `false` when the stream was already stopped and nothing was written.
    pub changed: bool,
}

pub struct StreamManager<R>
where
    R: StreamRepository + Send + Sync,
{
    repo: Arc<R>,
    /// Buffer estimate recorded in the sample written on start.
    start_buffer_secs: f64,
}

impl<R> StreamManager<R>
where
    R: StreamRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, start_buffer_secs: f64) -> Self {
        Self {
            repo,
            start_buffer_secs,
        }
    }

    /// Validate and persist a new stream in the `stopped` state.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewStream) -> Result<Stream> {
        let stream = input.into_stream()?;
        self.repo.upsert_stream(&stream.to_db_model()?).await?;

        info!(
            stream_id = %stream.id,
            protocol = %stream.protocol,
            bitrate_kbps = stream.bitrate_kbps,
            "Stream created"
        );
        Ok(stream)
    }

    pub async fn get(&self, id: &str) -> Result<Stream> {
        let model = self.repo.get_stream(id).await?;
        Stream::from_db_model(&model)
    }

    /// Move a stream to `running` and record the start sample.
    #[instrument(skip(self))]
    pub async fn start(&self, id: &str) -> Result<StartOutcome> {
        let stream = self.get(id).await?;
        if stream.status == StreamStatus::Running {
            return Err(Error::already_running(id));
        }
        let status = stream.status.transition_to(StreamStatus::Running)?;

        let started_at = now();
        let initial_check = HealthCheck::new(
            id,
            HealthStatus::Running,
            HealthMetrics {
                bitrate_kbps: stream.bitrate_kbps,
                dropped_frames: 0,
                buffer_secs: self.start_buffer_secs,
                latency_ms: 0,
            },
            started_at,
        );

        let applied = self
            .repo
            .mark_running(
                id,
                stream.version,
                datetime_to_ms(started_at),
                &initial_check.to_db_model(),
            )
            .await?;
        if !applied {
            return Err(Error::conflict("Stream", id));
        }

        info!(stream_id = %id, from = %stream.status, "Stream started");
        Ok(StartOutcome {
            stream_id: id.to_string(),
            status,
            started_at,
        })
    }

    /// Move a stream to `stopped`. Stopping a stopped stream writes nothing.
    #[instrument(skip(self))]
    pub async fn stop(&self, id: &str) -> Result<StopOutcome> {
        let stream = self.get(id).await?;
        if stream.status == StreamStatus::Stopped {
            debug!(stream_id = %id, "Stream already stopped");
            return Ok(StopOutcome {
                stream_id: id.to_string(),
                status: StreamStatus::Stopped,
                stopped_at: stream.stopped_at,
                changed: false,
            });
        }
        let status = stream.status.transition_to(StreamStatus::Stopped)?;

        let stopped_at = now();
        let applied = self
            .repo
            .mark_stopped(id, stream.version, datetime_to_ms(stopped_at))
            .await?;
        if !applied {
            return Err(Error::conflict("Stream", id));
        }

        info!(stream_id = %id, from = %stream.status, "Stream stopped");
        Ok(StopOutcome {
            stream_id: id.to_string(),
            status,
            stopped_at: Some(stopped_at),
            changed: true,
        })
    }
}
