//! Health sample ingestion and history.

mod monitor;

pub use monitor::{HealthMonitor, HealthReport};
