pub mod time_utils;

pub use time_utils::{civil_now, to_civil, MARKET_TZ};
