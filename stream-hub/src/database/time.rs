//! Timestamp helpers for the database layer.
//!
//! Every timestamp column (`created_at`, `started_at`, `stopped_at`,
//! `checked_at`) is an `INTEGER` holding Unix epoch milliseconds (UTC).

use chrono::{DateTime, TimeZone, Utc};

/// Current time truncated to millisecond precision.
///
/// Values handed back to callers must equal what a later read returns, so
/// sub-millisecond precision is dropped before anything is persisted.
#[inline]
pub fn now() -> DateTime<Utc> {
    ms_to_datetime(Utc::now().timestamp_millis())
}

#[inline]
pub fn datetime_to_ms(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Convert Unix epoch milliseconds to `DateTime<Utc>`.
///
/// Out-of-range values clamp to the nearest representable instant.
#[inline]
pub fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None if ms.is_negative() => DateTime::<Utc>::MIN_UTC,
        chrono::LocalResult::None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Nullable column variant of [`ms_to_datetime`].
#[inline]
pub fn opt_ms_to_datetime(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.map(ms_to_datetime)
}
