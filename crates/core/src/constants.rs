use std::time::Duration;

pub use crate::utils::time_utils::MARKET_TZ;

/// Period of the recurring price refresh.
pub const HOURLY_INTERVAL: Duration = Duration::from_millis(3_600_000);

/// Delay between consecutive stocks during a detail refresh.
pub const DEFAULT_DETAIL_THROTTLE: Duration = Duration::from_millis(500);

/// Price history older than this triggers a catch-up price refresh at startup.
pub const PRICE_STALENESS_HOURS: i64 = 1;

/// Price history older than this also triggers a catch-up detail refresh.
pub const DETAIL_STALENESS_HOURS: i64 = 24;

/// Trigger names registered with the scheduler handle.
pub const TRIGGER_HOURLY: &str = "hourly";
pub const TRIGGER_MIDNIGHT: &str = "midnight";
pub const TRIGGER_CATCH_UP: &str = "catch-up";
