use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// The civil timezone every stored timestamp is expressed in.
///
/// Recording, comparison, bucket truncation and the scheduler's boundaries all
/// use wall-clock time in this zone.
pub const MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Current wall-clock time in [`MARKET_TZ`].
pub fn civil_now() -> NaiveDateTime {
    to_civil(Utc::now())
}

/// Converts a UTC instant to wall-clock time in [`MARKET_TZ`].
pub fn to_civil(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&MARKET_TZ).naive_local()
}

/// Current instant, zoned in [`MARKET_TZ`].
pub fn zoned_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&MARKET_TZ)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable microsecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::microseconds(1)
}

/// Earliest instant strictly after `now` whose wall-clock time is
/// `floor + k * step` for some `k >= 0`.
///
/// Candidates that fall into a spring-forward gap are skipped; ambiguous
/// fall-back times contribute both of their instants.
fn next_boundary_after(now: &DateTime<Tz>, floor: NaiveDateTime, step: Duration) -> DateTime<Tz> {
    let tz = now.timezone();
    (0..4)
        .map(|k| floor + step * k)
        .flat_map(|naive| {
            let resolved = tz.from_local_datetime(&naive);
            [resolved.earliest(), resolved.latest()]
        })
        .flatten()
        .filter(|candidate| candidate > now)
        .min()
        // Unreachable for real zones; fall back to plain arithmetic on the instant.
        .unwrap_or_else(|| *now + step)
}

/// Next exact hour boundary (minutes, seconds and sub-seconds zero) after `now`.
pub fn next_hour_boundary(now: &DateTime<Tz>) -> DateTime<Tz> {
    let local = now.naive_local();
    let floor = local.date().and_time(NaiveTime::MIN) + Duration::hours(local.hour() as i64);
    next_boundary_after(now, floor, Duration::hours(1))
}

/// Next civil midnight after `now`.
pub fn next_midnight(now: &DateTime<Tz>) -> DateTime<Tz> {
    let floor = start_of_day(now.naive_local().date());
    next_boundary_after(now, floor, Duration::days(1))
}

/// Wall-clock delay from `now` until `target`, zero if already passed.
pub fn delay_until(now: &DateTime<Tz>, target: &DateTime<Tz>) -> std::time::Duration {
    (*target - *now).to_std().unwrap_or_default()
}
