//! Stream lifecycle: create, start, stop, list.

mod manager;

pub use manager::{StartOutcome, StopOutcome, StreamManager};
