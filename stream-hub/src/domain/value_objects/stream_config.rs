//! Per-stream output configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Output settings embedded in every stream record.
///
/// Stored as a JSON blob; missing keys fall back to their defaults so older
/// rows keep decoding when fields are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Target media segment duration in seconds.
    #[serde(default = "default_segment_duration_secs")]
    pub segment_duration_secs: u32,
    /// Number of segments kept in a live playlist window.
    #[serde(default = "default_playlist_size")]
    pub playlist_size: u32,
    #[serde(default = "default_buffer_secs")]
    pub buffer_secs: u32,
    #[serde(default)]
    pub low_latency: bool,
    #[serde(default)]
    pub encryption: bool,
}

fn default_segment_duration_secs() -> u32 {
    6
}

fn default_playlist_size() -> u32 {
    5
}

fn default_buffer_secs() -> u32 {
    10
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            segment_duration_secs: default_segment_duration_secs(),
            playlist_size: default_playlist_size(),
            buffer_secs: default_buffer_secs(),
            low_latency: false,
            encryption: false,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.segment_duration_secs == 0 {
            return Err(Error::validation(
                "segment_duration_secs must be at least 1",
            ));
        }
        if self.playlist_size == 0 {
            return Err(Error::validation("playlist_size must be at least 1"));
        }
        Ok(())
    }

    /// Decode the JSON column, treating an empty object as all defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
