//! Domain value objects.
//!
//! Value objects are immutable and validated on construction, so anything
//! holding one has already passed the input boundary.

mod protocol;
mod stream_config;
mod stream_name;
mod stream_url;

pub use protocol::Protocol;
pub use stream_config::StreamConfig;
pub use stream_name::StreamName;
pub use stream_url::StreamUrl;
