//! HLS artifacts derived from stream records.
//!
//! Everything here is pure: callers load the records and pass them in.

mod hls_config;
mod master;
mod media;

pub use hls_config::{HlsConfig, HlsVariant, hls_config};
pub use master::master_playlist;
pub use media::media_playlist;
