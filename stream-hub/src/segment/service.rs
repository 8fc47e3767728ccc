//! Segment service.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::database::repositories::{SegmentRepository, StreamRepository};
use crate::database::time::now;
use crate::domain::{NewSegment, Segment};
use crate::Result;

/// Identifiers of an appended segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentAppended {
    pub segment_id: String,
    pub stream_id: String,
    pub sequence: i64,
}

pub struct SegmentService<S, G>
where
    S: StreamRepository + Send + Sync,
    G: SegmentRepository + Send + Sync,
{
    streams: Arc<S>,
    segments: Arc<G>,
}

impl<S, G> SegmentService<S, G>
where
    S: StreamRepository + Send + Sync,
    G: SegmentRepository + Send + Sync,
{
    pub fn new(streams: Arc<S>, segments: Arc<G>) -> Self {
        Self { streams, segments }
    }

    /// Record a segment for an existing stream.
    #[instrument(skip(self, segment), fields(sequence = segment.sequence))]
    pub async fn append(&self, stream_id: &str, segment: NewSegment) -> Result<SegmentAppended> {
        self.streams.get_stream(stream_id).await?;
        let segment = segment.into_segment(stream_id, now())?;
        self.segments.create_segment(&segment.to_db_model()).await?;

        debug!(stream_id = %stream_id, segment_id = %segment.id, "Segment appended");
        Ok(SegmentAppended {
            segment_id: segment.id,
            stream_id: segment.stream_id,
            sequence: segment.sequence,
        })
    }

    /// All segments of a stream ordered by sequence.
    pub async fn list(&self, stream_id: &str) -> Result<Vec<Segment>> {
        let models = self.segments.list_for_stream(stream_id).await?;
        Ok(models.iter().map(Segment::from_db_model).collect())
    }

    /// The last `limit` segments by sequence, in ascending order.
    pub async fn window(&self, stream_id: &str, limit: u32) -> Result<Vec<Segment>> {
        let models = self
            .segments
            .list_latest_for_stream(stream_id, i64::from(limit))
            .await?;
        Ok(models.iter().map(Segment::from_db_model).collect())
    }
}
