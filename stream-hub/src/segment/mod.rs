//! Segment references and their read path.

mod service;

pub use service::{SegmentAppended, SegmentService};
