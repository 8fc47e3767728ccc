//! Domain layer for stream-hub.
//!
//! Entities, the stream status state machine, health classification and
//! the value objects that guard the validation boundary.

pub mod health;
pub mod segment;
pub mod stream;
pub mod value_objects;

pub use health::{HealthCheck, HealthMetrics, HealthSample, HealthStatus, HealthThresholds};
pub use segment::{NewSegment, Segment};
pub use stream::{NewStream, Stream, StreamStatus};
pub use value_objects::*;
