use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use super::*;
use crate::errors::{Error, Result};
use crate::testing::{civil, MemoryStore};
use crate::utils::time_utils::{civil_now, MARKET_TZ};

#[derive(Clone, Default)]
struct MockSync {
    calls: Arc<Mutex<Vec<&'static str>>>,
    completed: Arc<Mutex<Vec<&'static str>>>,
    job_duration: Duration,
    fail: bool,
}

impl MockSync {
    fn slow(job_duration: Duration) -> Self {
        Self {
            job_duration,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, kind: &str) -> usize {
        self.calls().iter().filter(|c| **c == kind).count()
    }

    fn completed(&self, kind: &str) -> usize {
        self.completed
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == kind)
            .count()
    }

    async fn run(&self, kind: &'static str, job: SyncJobKind) -> Result<SyncSummary> {
        self.calls.lock().unwrap().push(kind);
        if !self.job_duration.is_zero() {
            sleep(self.job_duration).await;
        }
        self.completed.lock().unwrap().push(kind);
        if self.fail {
            return Err(Error::Sync(format!("{} failed", kind)));
        }
        Ok(SyncSummary::new(job, 0))
    }
}

#[async_trait]
impl SyncServiceTrait for MockSync {
    async fn refresh_values(&self) -> Result<SyncSummary> {
        self.run("values", SyncJobKind::Values).await
    }

    async fn refresh_details(&self) -> Result<SyncSummary> {
        self.run("details", SyncJobKind::Details).await
    }

    async fn refresh_stock(&self, ticker: &str) -> Result<StockRefresh> {
        Ok(StockRefresh {
            ticker: ticker.to_string(),
            price_recorded: false,
            shareholders_recorded: 0,
        })
    }
}

fn market_time(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
    MARKET_TZ
        .from_local_datetime(
            &NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
        .single()
        .unwrap()
}

/// A clock that starts at `start` and moves with tokio's (possibly paused) time.
fn tokio_clock(start: DateTime<Tz>) -> ZonedClock {
    let origin = tokio::time::Instant::now();
    Arc::new(move || start + ChronoDuration::from_std(origin.elapsed()).unwrap())
}

/// Scheduler whose store was last written at `start`, so catch-up stays idle.
fn scheduler_at(sync: &MockSync, start: DateTime<Tz>) -> SyncScheduler {
    let store = MemoryStore::new();
    store.seed_price(1, "ABC", dec!(1), start.naive_local());
    SyncScheduler::new(Arc::new(sync.clone()), Arc::new(store)).with_clock(tokio_clock(start))
}

fn fresh_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_price(1, "ABC", dec!(1), civil_now());
    store
}

// -------------------------------------------------------------------------
// Catch-up decision
// -------------------------------------------------------------------------

#[test]
fn test_catch_up_plan_without_history_runs_everything() {
    let plan = catch_up_plan(None, civil("2024-03-04 12:00:00"));
    assert!(plan.refresh_values);
    assert!(plan.refresh_details);
}

#[test]
fn test_catch_up_plan_thresholds() {
    let now = civil("2024-03-04 12:00:00");
    let at = |age: ChronoDuration| catch_up_plan(Some(now - age), now);

    assert_eq!(at(ChronoDuration::minutes(30)), CatchUpPlan::default());
    assert_eq!(at(ChronoDuration::hours(1)), CatchUpPlan::default());
    assert_eq!(
        at(ChronoDuration::hours(1) + ChronoDuration::seconds(1)),
        CatchUpPlan {
            refresh_values: true,
            refresh_details: false
        }
    );
    assert_eq!(
        at(ChronoDuration::hours(24)),
        CatchUpPlan {
            refresh_values: true,
            refresh_details: false
        }
    );
    assert_eq!(
        at(ChronoDuration::hours(25)),
        CatchUpPlan {
            refresh_values: true,
            refresh_details: true
        }
    );
}

#[test]
fn test_catch_up_plan_ignores_future_cursor() {
    let now = civil("2024-03-04 12:00:00");
    let plan = catch_up_plan(Some(civil("2024-03-04 13:00:00")), now);
    assert_eq!(plan, CatchUpPlan::default());
}

#[tokio::test]
async fn test_check_runs_values_before_details_when_stale() {
    let sync = MockSync::default();
    let store = MemoryStore::new();
    store.seed_price(1, "ABC", dec!(1), civil_now() - ChronoDuration::days(3));

    let plan = check_and_run_scheduled_tasks(&sync, &store).await.unwrap();

    assert!(plan.refresh_values && plan.refresh_details);
    assert_eq!(sync.calls(), vec!["values", "details"]);
}

#[tokio::test]
async fn test_check_runs_only_values_when_an_hour_and_a_half_behind() {
    let sync = MockSync::default();
    let store = MemoryStore::new();
    store.seed_price(1, "ABC", dec!(1), civil_now() - ChronoDuration::minutes(90));

    let plan = check_and_run_scheduled_tasks(&sync, &store).await.unwrap();

    assert!(plan.refresh_values);
    assert!(!plan.refresh_details);
    assert_eq!(sync.calls(), vec!["values"]);
}

#[tokio::test]
async fn test_check_does_nothing_when_fresh() {
    let sync = MockSync::default();
    let plan = check_and_run_scheduled_tasks(&sync, &fresh_store())
        .await
        .unwrap();
    assert_eq!(plan, CatchUpPlan::default());
    assert!(sync.calls().is_empty());
}

#[tokio::test]
async fn test_check_survives_failing_jobs() {
    let sync = MockSync::failing();
    let plan = check_and_run_scheduled_tasks(&sync, &MemoryStore::new())
        .await
        .unwrap();
    assert!(plan.refresh_details);
    assert_eq!(sync.calls(), vec!["values", "details"]);
}

// -------------------------------------------------------------------------
// Triggers
// -------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_start_registers_all_triggers() {
    let sync = MockSync::default();
    let handle = SyncScheduler::new(Arc::new(sync.clone()), Arc::new(fresh_store())).start();

    assert_eq!(handle.trigger_names(), vec!["catch-up", "hourly", "midnight"]);
    assert!(handle.is_running("hourly"));
    assert!(!handle.is_running("weekly"));

    handle.stop_and_wait().await;
}

#[tokio::test(start_paused = true)]
async fn test_hourly_trigger_fires_every_hour() {
    let sync = MockSync::default();
    let handle = SyncScheduler::new(Arc::new(sync.clone()), Arc::new(fresh_store())).start();

    // The first run lands on the next boundary, at most an hour away.
    sleep(Duration::from_secs(3 * 3600 + 5)).await;
    let runs = sync.count("values");
    assert!((3..=4).contains(&runs), "hourly runs: {}", runs);

    handle.stop_and_wait().await;
    sleep(Duration::from_secs(3 * 3600)).await;
    assert_eq!(sync.count("values"), runs);
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_runs_at_start_when_empty() {
    let sync = MockSync::default();
    let handle = SyncScheduler::new(Arc::new(sync.clone()), Arc::new(MemoryStore::new())).start();

    sleep(Duration::from_millis(10)).await;
    assert_eq!(sync.count("values"), 1);
    assert_eq!(sync.count("details"), 1);
    assert!(!handle.is_running("catch-up"));

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn test_failing_job_keeps_trigger_alive() {
    let sync = MockSync::failing();
    let handle = SyncScheduler::new(Arc::new(sync.clone()), Arc::new(fresh_store())).start();

    sleep(Duration::from_secs(2 * 3600 + 5)).await;
    assert!(sync.count("values") >= 2);
    assert!(handle.is_running("hourly"));
    assert!(handle.is_running("midnight"));

    handle.stop_and_wait().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_lets_in_flight_job_finish() {
    let sync = MockSync::slow(Duration::from_secs(600));
    let handle = SyncScheduler::new(Arc::new(sync.clone()), Arc::new(fresh_store())).start();

    while sync.count("values") == 0 {
        sleep(Duration::from_secs(30)).await;
    }
    assert_eq!(sync.completed("values"), 0);

    handle.stop();
    sleep(Duration::from_secs(2 * 3600)).await;

    assert_eq!(sync.count("values"), 1);
    assert_eq!(sync.completed("values"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_midnight_trigger_runs_details_once_per_day() {
    let sync = MockSync::default();
    let handle = scheduler_at(&sync, market_time(2024, 6, 3, 18)).start();

    sleep(Duration::from_secs(5 * 3600)).await;
    assert_eq!(sync.count("details"), 0);

    // Midnight of June 4th, six hours in.
    sleep(Duration::from_secs(3600 + 30)).await;
    assert_eq!(sync.count("details"), 1);

    sleep(Duration::from_secs(23 * 3600)).await;
    assert_eq!(sync.count("details"), 1);

    // Re-armed for June 5th.
    sleep(Duration::from_secs(3600)).await;
    assert_eq!(sync.count("details"), 2);
    assert!(handle.is_running("midnight"));

    handle.stop_and_wait().await;
    sleep(Duration::from_secs(48 * 3600)).await;
    assert_eq!(sync.count("details"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_midnight_trigger_follows_short_dst_day() {
    let sync = MockSync::default();
    // 2024-03-10 has 23 hours in New York.
    let handle = scheduler_at(&sync, market_time(2024, 3, 9, 18)).start();

    sleep(Duration::from_secs(6 * 3600 + 30)).await;
    assert_eq!(sync.count("details"), 1);

    sleep(Duration::from_secs(22 * 3600 + 3000)).await;
    assert_eq!(sync.count("details"), 1);

    sleep(Duration::from_secs(600)).await;
    assert_eq!(sync.count("details"), 2);

    handle.stop_and_wait().await;
}

#[tokio::test(start_paused = true)]
async fn test_hourly_trigger_aligns_to_clock_boundary() {
    let sync = MockSync::default();
    let start = market_time(2024, 6, 3, 18) + ChronoDuration::minutes(40);
    let handle = scheduler_at(&sync, start).start();

    sleep(Duration::from_secs(19 * 60)).await;
    assert_eq!(sync.count("values"), 0);

    sleep(Duration::from_secs(2 * 60)).await;
    assert_eq!(sync.count("values"), 1);

    sleep(Duration::from_secs(3600)).await;
    assert_eq!(sync.count("values"), 2);

    handle.stop_and_wait().await;
}
