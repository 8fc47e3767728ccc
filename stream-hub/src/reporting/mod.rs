//! Aggregate views over streams and health samples.

mod service;

pub use service::{RecentHealth, ReportingService, StatsSnapshot};
