//! Repository layer for database access.
//!
//! Each table gets an `async_trait` repository with a sqlx implementation.
//! Multi-statement writes go through the `*TxOps` helpers inside one
//! immediate transaction.

pub mod health_check;
pub mod health_check_tx;
pub mod segment;
pub mod stream;
pub mod stream_tx;

pub use health_check::*;
pub use health_check_tx::*;
pub use segment::*;
pub use stream::*;
pub use stream_tx::*;
