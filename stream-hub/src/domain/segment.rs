//! Segment references appended by the media pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::SegmentDbModel;
use crate::database::time::{datetime_to_ms, ms_to_datetime};
use crate::{Error, Result};

/// Duration assumed when the caller does not supply one.
pub const DEFAULT_SEGMENT_DURATION_SECS: f64 = 6.0;

/// One chunk of media output belonging to a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub stream_id: String,
    pub sequence: i64,
    pub url: String,
    pub duration_secs: f64,
    pub created_at: DateTime<Utc>,
}

impl Segment {
    pub fn from_db_model(model: &SegmentDbModel) -> Self {
        Self {
            id: model.id.clone(),
            stream_id: model.stream_id.clone(),
            sequence: model.sequence,
            url: model.url.clone(),
            duration_secs: model.duration_secs,
            created_at: ms_to_datetime(model.created_at),
        }
    }

    pub fn to_db_model(&self) -> SegmentDbModel {
        SegmentDbModel {
            id: self.id.clone(),
            stream_id: self.stream_id.clone(),
            sequence: self.sequence,
            url: self.url.clone(),
            duration_secs: self.duration_secs,
            created_at: datetime_to_ms(self.created_at),
        }
    }
}

/// Caller input for appending a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSegment {
    /// Caller-assigned; uniqueness and ordering are not enforced.
    pub sequence: i64,
    pub url: String,
    #[serde(default = "default_duration")]
    pub duration_secs: f64,
}

fn default_duration() -> f64 {
    DEFAULT_SEGMENT_DURATION_SECS
}

impl NewSegment {
    pub fn new(sequence: i64, url: impl Into<String>) -> Self {
        Self {
            sequence,
            url: url.into(),
            duration_secs: DEFAULT_SEGMENT_DURATION_SECS,
        }
    }

    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Validate and stamp the segment for `stream_id`.
    pub fn into_segment(self, stream_id: &str, now: DateTime<Utc>) -> Result<Segment> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::validation("segment url cannot be empty"));
        }
        if url.contains(['\r', '\n']) {
            return Err(Error::validation("segment url cannot contain line breaks"));
        }
        if self.sequence < 0 {
            return Err(Error::validation(format!(
                "segment sequence must be non-negative, got {}",
                self.sequence
            )));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(Error::validation(format!(
                "segment duration must be positive, got {}",
                self.duration_secs
            )));
        }

        Ok(Segment {
            id: uuid::Uuid::new_v4().to_string(),
            stream_id: stream_id.to_string(),
            sequence: self.sequence,
            url: url.to_string(),
            duration_secs: self.duration_secs,
            created_at: now,
        })
    }
}
