//! Process-wide configuration.
//!
//! A [`HubConfig`] is built once at startup and handed to
//! [`StreamHub::connect`](crate::StreamHub::connect). Nothing in the library
//! reads a default storage location on its own.

use serde::{Deserialize, Serialize};

use crate::database::default_pool_size;
use crate::domain::HealthThresholds;
use crate::{Error, Result};

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "STREAM_HUB_DATABASE_URL";

/// Fallback environment variable, shared with sqlx tooling.
pub const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";

pub const MAX_CONNECTIONS_ENV: &str = "STREAM_HUB_MAX_CONNECTIONS";

/// Buffer estimate recorded in the sample written when a stream starts.
pub const DEFAULT_START_BUFFER_SECS: f64 = 10.0;

/// Number of samples in the stats snapshot.
pub const DEFAULT_RECENT_HEALTH_LIMIT: i64 = 20;

/// Number of samples returned by a history query without an explicit limit.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// sqlx SQLite URL, e.g. `sqlite:/var/lib/stream-hub/hub.db?mode=rwc`.
    pub database_url: String,
    pub max_connections: u32,
    pub thresholds: HealthThresholds,
    pub start_buffer_estimate_secs: f64,
    pub recent_health_limit: i64,
    pub default_history_limit: i64,
    /// Let health classifications move active streams between
    /// running / buffering / error.
    pub health_drives_status: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_pool_size(),
            thresholds: HealthThresholds::default(),
            start_buffer_estimate_secs: DEFAULT_START_BUFFER_SECS,
            recent_health_limit: DEFAULT_RECENT_HEALTH_LIMIT,
            default_history_limit: DEFAULT_HISTORY_LIMIT,
            health_drives_status: true,
        }
    }
}

impl HubConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides from `lookup` on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).or_else(|| lookup(DATABASE_URL_FALLBACK_ENV)) {
            self.database_url = url;
        }
        if let Some(raw) = lookup(MAX_CONNECTIONS_ENV) {
            self.max_connections = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a positive integer, got '{}'",
                    MAX_CONNECTIONS_ENV, raw
                ))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::config("database_url is not set"));
        }
        if self.max_connections == 0 {
            return Err(Error::config("max_connections must be at least 1"));
        }
        if self.thresholds.critical_dropped_frames < self.thresholds.degraded_dropped_frames {
            return Err(Error::config(
                "critical_dropped_frames must not be below degraded_dropped_frames",
            ));
        }
        if !self.start_buffer_estimate_secs.is_finite() || self.start_buffer_estimate_secs < 0.0 {
            return Err(Error::config(
                "start_buffer_estimate_secs must be a non-negative number",
            ));
        }
        if self.recent_health_limit < 1 || self.default_history_limit < 1 {
            return Err(Error::config("health limits must be at least 1"));
        }
        Ok(())
    }
}
