//! Database models for stream-hub.
//!
//! These map one-to-one onto table rows. Enumerations are stored as text,
//! timestamps as epoch milliseconds and the stream config as JSON.

pub mod health_check;
pub mod segment;
pub mod stream;

pub use health_check::*;
pub use segment::*;
pub use stream::*;
