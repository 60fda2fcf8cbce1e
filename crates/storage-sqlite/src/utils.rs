//! Text encodings for values SQLite has no native type for.
//!
//! Timestamps are civil wall-clock values written with a fixed-width
//! microsecond format, so lexicographic order on the column equals time
//! order and range filters can compare strings directly.

use chrono::NaiveDateTime;
use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Storage format of every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp, accepting values written without a fraction.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

pub(crate) fn timestamp_or_default(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap_or_else(|| {
        warn!("Unreadable stored timestamp '{}'", s);
        NaiveDateTime::default()
    })
}

pub(crate) fn decimal_or_default(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|_| {
        warn!("Unreadable stored decimal '{}'", s);
        Decimal::ZERO
    })
}
