//! Segment repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::SegmentDbModel;
use crate::database::retry::retry_on_sqlite_busy;
use crate::Result;

/// Segment repository trait.
#[async_trait]
pub trait SegmentRepository: Send + Sync {
    async fn create_segment(&self, segment: &SegmentDbModel) -> Result<()>;
    /// Segments of a stream ordered by sequence, then insertion order.
    async fn list_for_stream(&self, stream_id: &str) -> Result<Vec<SegmentDbModel>>;
    /// The `limit` highest-sequence segments, returned in ascending order.
    async fn list_latest_for_stream(
        &self,
        stream_id: &str,
        limit: i64,
    ) -> Result<Vec<SegmentDbModel>>;
}

/// SQLx implementation of SegmentRepository.
pub struct SqlxSegmentRepository {
    pool: SqlitePool,
}

impl SqlxSegmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SegmentRepository for SqlxSegmentRepository {
    async fn create_segment(&self, segment: &SegmentDbModel) -> Result<()> {
        retry_on_sqlite_busy("create_segment", || async {
            sqlx::query(
                r#"
                INSERT INTO segments (id, stream_id, sequence, url, duration_secs, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&segment.id)
            .bind(&segment.stream_id)
            .bind(segment.sequence)
            .bind(&segment.url)
            .bind(segment.duration_secs)
            .bind(segment.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn list_for_stream(&self, stream_id: &str) -> Result<Vec<SegmentDbModel>> {
        let segments = sqlx::query_as::<_, SegmentDbModel>(
            "SELECT * FROM segments WHERE stream_id = ? ORDER BY sequence ASC, created_at ASC, rowid ASC",
        )
        .bind(stream_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(segments)
    }

    async fn list_latest_for_stream(
        &self,
        stream_id: &str,
        limit: i64,
    ) -> Result<Vec<SegmentDbModel>> {
        let mut segments = sqlx::query_as::<_, SegmentDbModel>(
            r#"
            SELECT * FROM segments
            WHERE stream_id = ?
            ORDER BY sequence DESC, created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(stream_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        segments.reverse();
        Ok(segments)
    }
}
