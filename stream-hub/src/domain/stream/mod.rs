//! Stream domain module.

mod entity;
mod state;

pub use entity::{DEFAULT_BITRATE_KBPS, MAX_BITRATE_KBPS, NewStream, Stream};
pub use state::StreamStatus;
