//! Stream entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StreamStatus;
use crate::database::models::StreamDbModel;
use crate::database::time::{datetime_to_ms, ms_to_datetime, opt_ms_to_datetime};
use crate::domain::{Protocol, StreamConfig, StreamName, StreamUrl};
use crate::{Error, Result};

/// Bitrate used when a caller does not supply one.
pub const DEFAULT_BITRATE_KBPS: i64 = 2000;

/// Upper bound accepted at the validation boundary (1 Gbps).
pub const MAX_BITRATE_KBPS: i64 = 1_000_000;

/// A declared media stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub name: String,
    pub source_url: String,
    pub target_url: String,
    pub protocol: Protocol,
    pub bitrate_kbps: u32,
    pub status: StreamStatus,
    pub config: StreamConfig,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    /// Incremented by every status change.
    pub version: i64,
}

impl Stream {
    /// Build an unsaved stream with a fresh id and default config.
    ///
    /// Performs no validation; use [`NewStream`] for caller input.
    pub fn new(
        name: impl Into<String>,
        source_url: impl Into<String>,
        target_url: impl Into<String>,
        protocol: Protocol,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            source_url: source_url.into(),
            target_url: target_url.into(),
            protocol,
            bitrate_kbps,
            status: StreamStatus::Stopped,
            config: StreamConfig::default(),
            created_at: crate::database::time::now(),
            started_at: None,
            stopped_at: None,
            version: 0,
        }
    }

    /// Where the generated HLS output lives: the target URL, or a path
    /// derived from the id when no target is configured.
    pub fn output_url(&self) -> String {
        if self.target_url.is_empty() {
            format!("/streams/{}/playlist.m3u8", self.id)
        } else {
            self.target_url.clone()
        }
    }

    /// URL advertised in a master playlist: target, else source, else empty.
    pub fn playlist_url(&self) -> &str {
        if !self.target_url.is_empty() {
            &self.target_url
        } else {
            &self.source_url
        }
    }

    pub fn from_db_model(model: &StreamDbModel) -> Result<Self> {
        let protocol = model.protocol.parse::<Protocol>().map_err(|_| {
            Error::Database(format!(
                "stream {} has unknown protocol '{}'",
                model.id, model.protocol
            ))
        })?;
        let status = StreamStatus::parse(&model.status).ok_or_else(|| {
            Error::Database(format!(
                "stream {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;
        let bitrate_kbps = u32::try_from(model.bitrate_kbps).map_err(|_| {
            Error::Database(format!(
                "stream {} has out-of-range bitrate {}",
                model.id, model.bitrate_kbps
            ))
        })?;

        Ok(Self {
            id: model.id.clone(),
            name: model.name.clone(),
            source_url: model.source_url.clone(),
            target_url: model.target_url.clone(),
            protocol,
            bitrate_kbps,
            status,
            config: StreamConfig::from_json(&model.config)?,
            created_at: ms_to_datetime(model.created_at),
            started_at: opt_ms_to_datetime(model.started_at),
            stopped_at: opt_ms_to_datetime(model.stopped_at),
            version: model.version,
        })
    }

    pub fn to_db_model(&self) -> Result<StreamDbModel> {
        Ok(StreamDbModel {
            id: self.id.clone(),
            name: self.name.clone(),
            source_url: self.source_url.clone(),
            target_url: self.target_url.clone(),
            protocol: self.protocol.as_str().to_string(),
            bitrate_kbps: i64::from(self.bitrate_kbps),
            status: self.status.as_str().to_string(),
            config: self.config.to_json()?,
            created_at: datetime_to_ms(self.created_at),
            started_at: self.started_at.map(datetime_to_ms),
            stopped_at: self.stopped_at.map(datetime_to_ms),
            version: self.version,
        })
    }
}

/// Caller input for creating a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStream {
    pub name: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: i64,
    #[serde(default)]
    pub config: StreamConfig,
}

fn default_bitrate() -> i64 {
    DEFAULT_BITRATE_KBPS
}

impl NewStream {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: String::new(),
            target_url: String::new(),
            protocol: Protocol::default(),
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            config: StreamConfig::default(),
        }
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_target(mut self, url: impl Into<String>) -> Self {
        self.target_url = url.into();
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_bitrate(mut self, bitrate_kbps: i64) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the input and build the stream record to persist.
    pub fn into_stream(self) -> Result<Stream> {
        let name = StreamName::new(self.name)?;
        let source_url = StreamUrl::new("source_url", self.source_url)?;
        let target_url = StreamUrl::new("target_url", self.target_url)?;

        if !(1..=MAX_BITRATE_KBPS).contains(&self.bitrate_kbps) {
            return Err(Error::validation(format!(
                "bitrate_kbps must be between 1 and {}, got {}",
                MAX_BITRATE_KBPS, self.bitrate_kbps
            )));
        }
        self.config.validate()?;

        // Range checked above.
        let bitrate_kbps = self.bitrate_kbps as u32;

        let mut stream = Stream::new(name, source_url, target_url, self.protocol, bitrate_kbps);
        stream.config = self.config;
        Ok(stream)
    }
}
