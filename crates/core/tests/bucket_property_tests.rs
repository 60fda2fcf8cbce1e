//! Property-based tests for bucketing and scheduler boundaries.
//!
//! Random price series and random instants, checked with `proptest`.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use stockhist_core::history::{bucketize, Frequency, PricePoint};
use stockhist_core::utils::time_utils::{delay_until, next_hour_boundary, next_midnight};
use stockhist_core::utils::MARKET_TZ;

// =============================================================================
// Generators
// =============================================================================

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Raw),
        Just(Frequency::Hourly),
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
    ]
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Up to 200 points spread over roughly a year, seconds resolution.
fn arb_series() -> impl Strategy<Value = Vec<PricePoint>> {
    prop::collection::vec((0i64..31_536_000, 1i64..100_000), 0..200).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (offset, cents))| PricePoint {
                id: i as i64 + 1,
                stock_id: 1,
                ticker: "ABC".to_string(),
                share_price: Decimal::new(cents, 2),
                recorded_at: base_time() + Duration::seconds(offset),
            })
            .collect()
    })
}

// =============================================================================
// Bucketing
// =============================================================================

proptest! {
    #[test]
    fn buckets_are_newest_first_and_unique(series in arb_series(), freq in arb_frequency()) {
        let out = bucketize(series.clone(), freq);

        prop_assert!(out.len() <= series.len());
        prop_assert!(out.windows(2).all(|w| w[0].recorded_at >= w[1].recorded_at));

        if freq == Frequency::Raw {
            prop_assert_eq!(out.len(), series.len());
        } else {
            let starts: HashSet<_> = out.iter().map(|p| p.recorded_at).collect();
            prop_assert_eq!(starts.len(), out.len());
            let expected: HashSet<_> = series.iter().map(|p| freq.truncate(p.recorded_at)).collect();
            prop_assert_eq!(starts, expected);
        }
    }

    #[test]
    fn each_bucket_holds_its_earliest_sample(series in arb_series(), freq in arb_frequency()) {
        prop_assume!(freq != Frequency::Raw);
        for bucket in bucketize(series.clone(), freq) {
            prop_assert_eq!(freq.truncate(bucket.recorded_at), bucket.recorded_at);
            let earliest = series
                .iter()
                .filter(|p| freq.truncate(p.recorded_at) == bucket.recorded_at)
                .min_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.cmp(&b.id)))
                .unwrap();
            prop_assert_eq!(earliest.id, bucket.id);
            prop_assert_eq!(earliest.share_price, bucket.share_price);
        }
    }

    #[test]
    fn bucketing_ignores_input_order(series in arb_series(), freq in arb_frequency()) {
        let mut reversed = series.clone();
        reversed.reverse();
        prop_assert_eq!(bucketize(series, freq), bucketize(reversed, freq));
    }
}

// =============================================================================
// Scheduler boundaries
// =============================================================================

proptest! {
    #[test]
    fn next_hour_is_a_round_hour_within_an_hour(secs in 1_600_000_000i64..1_900_000_000) {
        let now = Utc.timestamp_opt(secs, 0).unwrap().with_timezone(&MARKET_TZ);
        let next = next_hour_boundary(&now);

        prop_assert!(next > now);
        prop_assert_eq!((next.minute(), next.second(), next.nanosecond()), (0, 0, 0));
        prop_assert!(delay_until(&now, &next).as_secs() <= 3600);
    }

    #[test]
    fn next_midnight_is_civil_midnight(secs in 1_600_000_000i64..1_900_000_000) {
        let now = Utc.timestamp_opt(secs, 0).unwrap().with_timezone(&MARKET_TZ);
        let next = next_midnight(&now);

        prop_assert!(next > now);
        prop_assert_eq!(next.naive_local().time(), chrono::NaiveTime::MIN);
        prop_assert!(delay_until(&now, &next).as_secs() <= 25 * 3600);
    }
}
