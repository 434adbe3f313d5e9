//! Normalization of the indexing service's block timestamps.
//!
//! The service renders timestamps as `YYYY-MM-DD H:MM:SS[.f] +HH:MM:SS`: a
//! space separator, hours that may be a single digit, and an offset carrying
//! a superfluous seconds component. None of that is RFC 3339.
use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::Regex;

/// Returned by [`normalize_timestamp`] for input it cannot make sense of.
pub const UNPARSEABLE_TIMESTAMP: &str = "Invalid Date";

lazy_static! {
    static ref SERVICE_TIMESTAMP: Regex = Regex::new(
        r"^(\d{4}-\d{2}-\d{2})[ T](\d{1,2}):(\d{2}):(\d{2}(?:\.\d+)?)\s*(Z|[+-]\d{2}:\d{2})(?::\d{2})?$"
    )
    .unwrap();
}

/// Rewrites a service timestamp as RFC 3339, e.g.
/// `2025-12-16 2:01:12.0 +00:00:00` becomes `2025-12-16T02:01:12.0+00:00`.
///
/// Never fails: input that does not describe a valid instant yields
/// [`UNPARSEABLE_TIMESTAMP`].
pub fn normalize_timestamp(raw: &str) -> String {
    let Some(captures) = SERVICE_TIMESTAMP.captures(raw.trim()) else {
        return UNPARSEABLE_TIMESTAMP.to_string();
    };

    let offset = match &captures[5] {
        "Z" => "+00:00",
        offset => offset,
    };
    let normalized = format!(
        "{}T{:0>2}:{}:{}{}",
        &captures[1], &captures[2], &captures[3], &captures[4], offset
    );

    match DateTime::parse_from_rfc3339(&normalized) {
        Ok(_) => normalized,
        Err(_) => UNPARSEABLE_TIMESTAMP.to_string(),
    }
}

/// Parses a service timestamp, or `None` when it normalizes to the sentinel.
pub fn parse_block_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&normalize_timestamp(raw)).ok()
}
