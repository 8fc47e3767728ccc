//! stream-hub library crate.
//!
//! Bookkeeping for declared media streams: lifecycle status, health samples,
//! segment references and the HLS artifacts derived from them.

pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod health;
pub mod logging;
pub mod playlist;
pub mod reporting;
pub mod segment;
pub mod services;
pub mod stream;

pub use config::HubConfig;
pub use error::{Error, Result};
pub use services::StreamHub;
