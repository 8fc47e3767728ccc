//! Service container.
//!
//! [`StreamHub`] owns the pool and the services built on it, and exposes
//! one method per operation of the command surface.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use crate::config::HubConfig;
use crate::database::repositories::{
    SqlxHealthCheckRepository, SqlxSegmentRepository, SqlxStreamRepository,
};
use crate::database::{init_pool_with_size, run_migrations};
use crate::domain::{HealthCheck, HealthSample, NewSegment, NewStream, Segment, Stream, StreamStatus};
use crate::health::{HealthMonitor, HealthReport};
use crate::playlist::{self, HlsConfig};
use crate::reporting::{ReportingService, StatsSnapshot};
use crate::segment::{SegmentAppended, SegmentService};
use crate::stream::{StartOutcome, StopOutcome, StreamManager};
use crate::Result;

pub type SqlxStreamManager = StreamManager<SqlxStreamRepository>;
pub type SqlxHealthMonitor = HealthMonitor<SqlxStreamRepository, SqlxHealthCheckRepository>;
pub type SqlxSegmentService = SegmentService<SqlxStreamRepository, SqlxSegmentRepository>;
pub type SqlxReportingService = ReportingService<SqlxStreamRepository, SqlxHealthCheckRepository>;

pub struct StreamHub {
    pub pool: SqlitePool,
    pub config: HubConfig,
    pub streams: Arc<SqlxStreamManager>,
    pub health: Arc<SqlxHealthMonitor>,
    pub segments: Arc<SqlxSegmentService>,
    pub reporting: Arc<SqlxReportingService>,
}

impl StreamHub {
    /// Open the database named by `config`, apply migrations and build the
    /// services.
    pub async fn connect(config: &HubConfig) -> Result<Self> {
        config.validate()?;
        let pool = init_pool_with_size(&config.database_url, config.max_connections).await?;
        run_migrations(&pool).await?;
        Ok(Self::from_pool(pool, config.clone()))
    }

    /// Build the services on an already migrated pool.
    pub fn from_pool(pool: SqlitePool, config: HubConfig) -> Self {
        let stream_repo = Arc::new(SqlxStreamRepository::new(pool.clone()));
        let health_repo = Arc::new(SqlxHealthCheckRepository::new(pool.clone()));
        let segment_repo = Arc::new(SqlxSegmentRepository::new(pool.clone()));

        let streams = Arc::new(StreamManager::new(
            stream_repo.clone(),
            config.start_buffer_estimate_secs,
        ));
        let health = Arc::new(HealthMonitor::new(
            stream_repo.clone(),
            health_repo.clone(),
            config.thresholds,
            config.health_drives_status,
        ));
        let segments = Arc::new(SegmentService::new(stream_repo.clone(), segment_repo));
        let reporting = Arc::new(ReportingService::new(
            stream_repo,
            health_repo,
            config.recent_health_limit,
        ));

        debug!("Service container initialized");

        Self {
            pool,
            config,
            streams,
            health,
            segments,
            reporting,
        }
    }

    pub async fn create_stream(&self, input: NewStream) -> Result<Stream> {
        self.streams.create(input).await
    }

    pub async fn get_stream(&self, id: &str) -> Result<Stream> {
        self.streams.get(id).await
    }

    pub async fn start_stream(&self, id: &str) -> Result<StartOutcome> {
        self.streams.start(id).await
    }

    pub async fn stop_stream(&self, id: &str) -> Result<StopOutcome> {
        self.streams.stop(id).await
    }

    pub async fn report_health(&self, id: &str, sample: HealthSample) -> Result<HealthReport> {
        self.health.report(id, sample).await
    }

    pub async fn stats(&self) -> Result<StatsSnapshot> {
        self.reporting.stats().await
    }

    pub async fn hls_config_for(&self, id: &str) -> Result<HlsConfig> {
        let stream = self.streams.get(id).await?;
        Ok(playlist::hls_config(&stream))
    }

    /// Master playlist over every started stream. Streams that health
    /// sampling moved to `buffering` or `error` stay listed.
    pub async fn master_playlist_for_active(&self) -> Result<String> {
        let active = self.reporting.list_active().await?;
        Ok(playlist::master_playlist(&active))
    }

    pub async fn list_streams(&self, status: Option<StreamStatus>) -> Result<Vec<Stream>> {
        self.reporting.list(status).await
    }

    /// Health history; `limit` defaults to the configured history limit.
    pub async fn health_history(&self, id: &str, limit: Option<i64>) -> Result<Vec<HealthCheck>> {
        let limit = limit.unwrap_or(self.config.default_history_limit);
        self.health.history(id, limit).await
    }

    pub async fn append_segment(&self, id: &str, segment: NewSegment) -> Result<SegmentAppended> {
        self.segments.append(id, segment).await
    }

    pub async fn list_segments(&self, id: &str) -> Result<Vec<Segment>> {
        self.segments.list(id).await
    }

    pub async fn media_playlist_for(&self, id: &str) -> Result<String> {
        let stream = self.streams.get(id).await?;
        let window = self
            .segments
            .window(id, stream.config.playlist_size)
            .await?;
        Ok(playlist::media_playlist(&stream, &window))
    }
}
