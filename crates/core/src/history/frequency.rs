use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};

/// Bucket granularity for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every observation, unreduced.
    #[serde(alias = "minutely")]
    Raw,
    Hourly,
    Daily,
    /// Weeks start on Monday.
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Raw,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
    ];

    /// Keyword used by the query API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Raw => "minutely",
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Whether bucket timestamps carry no time-of-day information.
    pub fn is_date_only(&self) -> bool {
        matches!(
            self,
            Frequency::Daily | Frequency::Weekly | Frequency::Monthly
        )
    }

    /// Start of the bucket enclosing `ts`. `Raw` returns `ts` unchanged.
    pub fn truncate(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let date = ts.date();
        match self {
            Frequency::Raw => ts,
            Frequency::Hourly => date.and_time(NaiveTime::MIN) + Duration::hours(ts.hour() as i64),
            Frequency::Daily => date.and_time(NaiveTime::MIN),
            Frequency::Weekly => {
                let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                monday.and_time(NaiveTime::MIN)
            }
            Frequency::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .unwrap_or(date)
                .and_time(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "minutely" => Ok(Frequency::Raw),
            "hour" | "hourly" => Ok(Frequency::Hourly),
            "day" | "daily" => Ok(Frequency::Daily),
            "week" | "weekly" => Ok(Frequency::Weekly),
            "month" | "monthly" => Ok(Frequency::Monthly),
            _ => Err(ValidationError::InvalidInput(format!(
                "Invalid frequency parameter. Valid options are: {}",
                Frequency::ALL.map(|f| f.as_str()).join(", ")
            ))
            .into()),
        }
    }
}
