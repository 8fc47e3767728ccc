//! Health samples and their classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StreamStatus;
use crate::database::models::HealthCheckDbModel;
use crate::database::time::{datetime_to_ms, ms_to_datetime};
use crate::{Error, Result};

/// Classified status of a health sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
    /// Synthetic sample written when a stream is started.
    Running,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Critical => "critical",
            Self::Running => "running",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "healthy" => Some(Self::Healthy),
            "degraded" => Some(Self::Degraded),
            "critical" => Some(Self::Critical),
            "running" => Some(Self::Running),
            _ => None,
        }
    }

    /// Stream status an active stream moves to after a sample of this class.
    pub fn stream_status(&self) -> StreamStatus {
        match self {
            Self::Healthy | Self::Running => StreamStatus::Running,
            Self::Degraded => StreamStatus::Buffering,
            Self::Critical => StreamStatus::Error,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification thresholds. A value must exceed the threshold to trip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthThresholds {
    #[serde(default = "default_degraded_dropped_frames")]
    pub degraded_dropped_frames: u64,
    #[serde(default = "default_critical_dropped_frames")]
    pub critical_dropped_frames: u64,
    #[serde(default = "default_critical_latency_ms")]
    pub critical_latency_ms: u64,
}

fn default_degraded_dropped_frames() -> u64 {
    50
}

fn default_critical_dropped_frames() -> u64 {
    200
}

fn default_critical_latency_ms() -> u64 {
    5000
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            degraded_dropped_frames: default_degraded_dropped_frames(),
            critical_dropped_frames: default_critical_dropped_frames(),
            critical_latency_ms: default_critical_latency_ms(),
        }
    }
}

impl HealthThresholds {
    /// Classify a measurement. The most severe matching class wins.
    pub fn classify(&self, dropped_frames: u64, latency_ms: u64) -> HealthStatus {
        let mut status = HealthStatus::Healthy;
        if dropped_frames > self.degraded_dropped_frames {
            status = HealthStatus::Degraded;
        }
        if dropped_frames > self.critical_dropped_frames || latency_ms > self.critical_latency_ms {
            status = HealthStatus::Critical;
        }
        status
    }
}

/// A measurement reported for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthSample {
    /// Observed bitrate; the stream's configured bitrate is used when absent.
    #[serde(default)]
    pub bitrate_kbps: Option<u32>,
    #[serde(default)]
    pub dropped_frames: u64,
    #[serde(default)]
    pub buffer_secs: f64,
    #[serde(default)]
    pub latency_ms: u64,
}

impl HealthSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = Some(bitrate_kbps);
        self
    }

    pub fn with_dropped_frames(mut self, dropped_frames: u64) -> Self {
        self.dropped_frames = dropped_frames;
        self
    }

    pub fn with_buffer_secs(mut self, buffer_secs: f64) -> Self {
        self.buffer_secs = buffer_secs;
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.buffer_secs.is_finite() || self.buffer_secs < 0.0 {
            return Err(Error::validation(format!(
                "buffer_secs must be a non-negative number, got {}",
                self.buffer_secs
            )));
        }
        if i64::try_from(self.dropped_frames).is_err() || i64::try_from(self.latency_ms).is_err() {
            return Err(Error::validation("dropped_frames/latency_ms out of range"));
        }
        Ok(())
    }
}

/// Metrics recorded with a health check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub bitrate_kbps: u32,
    pub dropped_frames: u64,
    pub buffer_secs: f64,
    pub latency_ms: u64,
}

/// A persisted health sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub id: String,
    pub stream_id: String,
    pub status: HealthStatus,
    #[serde(flatten)]
    pub metrics: HealthMetrics,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheck {
    pub fn new(
        stream_id: impl Into<String>,
        status: HealthStatus,
        metrics: HealthMetrics,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stream_id: stream_id.into(),
            status,
            metrics,
            checked_at,
        }
    }

    pub fn from_db_model(model: &HealthCheckDbModel) -> Result<Self> {
        let status = HealthStatus::parse(&model.status).ok_or_else(|| {
            Error::Database(format!(
                "health check {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;
        let out_of_range = |field: &str| {
            Error::Database(format!("health check {} has out-of-range {}", model.id, field))
        };

        Ok(Self {
            id: model.id.clone(),
            stream_id: model.stream_id.clone(),
            status,
            metrics: HealthMetrics {
                bitrate_kbps: u32::try_from(model.bitrate_kbps)
                    .map_err(|_| out_of_range("bitrate_kbps"))?,
                dropped_frames: u64::try_from(model.dropped_frames)
                    .map_err(|_| out_of_range("dropped_frames"))?,
                buffer_secs: model.buffer_secs,
                latency_ms: u64::try_from(model.latency_ms)
                    .map_err(|_| out_of_range("latency_ms"))?,
            },
            checked_at: ms_to_datetime(model.checked_at),
        })
    }

    /// Convert for persistence. Metrics must already be validated.
    pub fn to_db_model(&self) -> HealthCheckDbModel {
        HealthCheckDbModel {
            id: self.id.clone(),
            stream_id: self.stream_id.clone(),
            status: self.status.as_str().to_string(),
            bitrate_kbps: i64::from(self.metrics.bitrate_kbps),
            dropped_frames: i64::try_from(self.metrics.dropped_frames).unwrap_or(i64::MAX),
            buffer_secs: self.metrics.buffer_secs,
            latency_ms: i64::try_from(self.metrics.latency_ms).unwrap_or(i64::MAX),
            checked_at: datetime_to_ms(self.checked_at),
        }
    }
}
