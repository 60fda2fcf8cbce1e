//! History domain models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::{end_of_day, start_of_day, to_civil};

/// One recorded price for a stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub share_price: Decimal,
    pub recorded_at: NaiveDateTime,
}

/// One holder line as recorded during a detail sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareholderSnapshot {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub username: String,
    pub account_id: i32,
    pub shares: i64,
    pub recorded_at: NaiveDateTime,
}

/// Inclusive civil-time range; a missing bound means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// How a date-only input is widened to a timestamp.
#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(input: &str, bound: Bound) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(match bound {
            Bound::Start => start_of_day(date),
            Bound::End => end_of_day(date),
        });
    }
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    // Explicit offsets are converted into the market zone.
    DateTime::parse_from_rfc3339(input)
        .map(|dt| to_civil(dt.with_timezone(&Utc)))
        .map_err(|_| {
            ValidationError::InvalidInput(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                input
            ))
            .into()
        })
}

impl TimeRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds a range from raw query-string bounds.
    ///
    /// A date-only `start` begins at midnight and a date-only `end` covers the
    /// whole day. An `end` without a `start` is rejected, as is `start > end`.
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.filter(|s| !s.trim().is_empty());
        let end = end.filter(|s| !s.trim().is_empty());
        if start.is_none() && end.is_some() {
            return Err(ValidationError::InvalidInput(
                "endDate requires startDate".to_string(),
            )
            .into());
        }
        let range = Self {
            from: start.map(|s| parse_bound(s, Bound::Start)).transpose()?,
            to: end.map(|s| parse_bound(s, Bound::End)).transpose()?,
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(ValidationError::InvalidInput(format!(
                "Range start {} is after range end {}",
                from, to
            ))
            .into()),
            _ => Ok(()),
        }
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.from.map_or(true, |from| *ts >= from) && self.to.map_or(true, |to| *ts <= to)
    }
}
