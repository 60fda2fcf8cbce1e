//! Recurring and startup triggers for the refresh jobs.
//!
//! Three triggers run as independent tokio tasks:
//!
//! - `hourly`: first fires on the next civil hour boundary, then every hour.
//! - `midnight`: fires at every civil midnight, re-armed after each run.
//! - `catch-up`: runs once at start when recorded prices are stale.
//!
//! A trigger awaits its own job before waiting again. Stopping wakes
//! triggers that are waiting; a job already running is left to finish.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime};
use chrono_tz::Tz;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use super::sync_service::SyncServiceTrait;
use crate::constants::{
    DETAIL_STALENESS_HOURS, HOURLY_INTERVAL, PRICE_STALENESS_HOURS, TRIGGER_CATCH_UP,
    TRIGGER_HOURLY, TRIGGER_MIDNIGHT,
};
use crate::errors::Result;
use crate::history::HistoryStore;
use crate::utils::time_utils::{delay_until, next_hour_boundary, next_midnight, zoned_now};

/// Source of the zoned instant the triggers schedule against.
pub type ZonedClock = Arc<dyn Fn() -> DateTime<Tz> + Send + Sync>;

/// Which jobs a startup catch-up run needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatchUpPlan {
    pub refresh_values: bool,
    pub refresh_details: bool,
}

/// Decides the catch-up run from the newest recorded price.
///
/// No history, or history strictly older than the thresholds, means the
/// corresponding job is due.
pub fn catch_up_plan(last: Option<NaiveDateTime>, now: NaiveDateTime) -> CatchUpPlan {
    match last {
        None => CatchUpPlan {
            refresh_values: true,
            refresh_details: true,
        },
        Some(last) => {
            let age = now - last;
            CatchUpPlan {
                refresh_values: age > ChronoDuration::hours(PRICE_STALENESS_HOURS),
                refresh_details: age > ChronoDuration::hours(DETAIL_STALENESS_HOURS),
            }
        }
    }
}

/// Runs whatever the catch-up plan calls for, values first.
///
/// Job failures are logged and do not fail the check; only reading the sync
/// cursor can.
pub async fn check_and_run_scheduled_tasks(
    sync: &dyn SyncServiceTrait,
    history: &dyn HistoryStore,
) -> Result<CatchUpPlan> {
    run_catch_up(sync, history, zoned_now().naive_local()).await
}

async fn run_catch_up(
    sync: &dyn SyncServiceTrait,
    history: &dyn HistoryStore,
    now: NaiveDateTime,
) -> Result<CatchUpPlan> {
    let last = history.latest_observation_time()?;
    let plan = catch_up_plan(last, now);

    match last {
        Some(last) => info!("Last recorded price at {}, now {}", last, now),
        None => info!("No recorded prices yet"),
    }

    if plan.refresh_values {
        info!("Price history is stale, running catch-up values refresh");
        if let Err(e) = sync.refresh_values().await {
            error!("Catch-up values refresh failed: {}", e);
        }
    }
    if plan.refresh_details {
        info!("Detail history is stale, running catch-up details refresh");
        if let Err(e) = sync.refresh_details().await {
            error!("Catch-up details refresh failed: {}", e);
        }
    }
    if !plan.refresh_values && !plan.refresh_details {
        debug!("History is fresh, no catch-up needed");
    }
    Ok(plan)
}

struct TriggerHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Running triggers, by name.
pub struct SchedulerHandle {
    triggers: HashMap<&'static str, TriggerHandle>,
}

impl SchedulerHandle {
    pub fn trigger_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.triggers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Whether the named trigger's task is still alive.
    pub fn is_running(&self, name: &str) -> bool {
        self.triggers
            .get(name)
            .is_some_and(|t| !t.task.is_finished())
    }

    fn signal_all(&self) {
        for trigger in self.triggers.values() {
            // A closed channel means the trigger already exited.
            let _ = trigger.cancel.send(true);
        }
    }

    /// Signals every trigger to stop. Waiting triggers exit promptly; a job in
    /// flight runs to completion in the background.
    pub fn stop(self) {
        info!("Stopping scheduler triggers: {:?}", self.trigger_names());
        self.signal_all();
    }

    /// Like [`stop`](Self::stop), then waits for every trigger task to end.
    pub async fn stop_and_wait(self) {
        info!("Stopping scheduler triggers: {:?}", self.trigger_names());
        self.signal_all();
        for (name, trigger) in self.triggers {
            if let Err(e) = trigger.task.await {
                warn!("Scheduler trigger '{}' ended abnormally: {}", name, e);
            }
        }
        info!("Scheduler stopped");
    }
}

/// Resolves once the trigger is told to stop or its handle is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    while !*cancel.borrow_and_update() {
        if cancel.changed().await.is_err() {
            return;
        }
    }
}

async fn run_values(sync: &dyn SyncServiceTrait, trigger: &str) {
    match sync.refresh_values().await {
        Ok(summary) => info!("[{}] {}", trigger, summary),
        Err(e) => error!("[{}] values refresh failed: {}", trigger, e),
    }
}

async fn run_details(sync: &dyn SyncServiceTrait, trigger: &str) {
    match sync.refresh_details().await {
        Ok(summary) => info!("[{}] {}", trigger, summary),
        Err(e) => error!("[{}] details refresh failed: {}", trigger, e),
    }
}

/// Owns the collaborators the triggers need.
pub struct SyncScheduler {
    sync: Arc<dyn SyncServiceTrait>,
    history: Arc<dyn HistoryStore>,
    clock: ZonedClock,
}

impl SyncScheduler {
    pub fn new(sync: Arc<dyn SyncServiceTrait>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            sync,
            history,
            clock: Arc::new(zoned_now),
        }
    }

    pub fn with_clock(mut self, clock: ZonedClock) -> Self {
        self.clock = clock;
        self
    }

    /// See [`check_and_run_scheduled_tasks`].
    pub async fn check_and_run_scheduled_tasks(&self) -> Result<CatchUpPlan> {
        let now = (self.clock)().naive_local();
        run_catch_up(self.sync.as_ref(), self.history.as_ref(), now).await
    }

    /// Spawns all triggers on the current tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let mut triggers = HashMap::new();

        let (sync, clock) = (self.sync.clone(), self.clock.clone());
        triggers.insert(
            TRIGGER_HOURLY,
            spawn_trigger(move |cancel| hourly_trigger(sync, clock, cancel)),
        );

        let (sync, clock) = (self.sync.clone(), self.clock.clone());
        triggers.insert(
            TRIGGER_MIDNIGHT,
            spawn_trigger(move |cancel| midnight_trigger(sync, clock, cancel)),
        );

        let (sync, history, clock) = (self.sync.clone(), self.history.clone(), self.clock.clone());
        triggers.insert(
            TRIGGER_CATCH_UP,
            spawn_trigger(move |cancel| catch_up_trigger(sync, history, clock, cancel)),
        );

        info!("Scheduler started with triggers: hourly, midnight, catch-up");
        SchedulerHandle { triggers }
    }
}

fn spawn_trigger<F, Fut>(body: F) -> TriggerHandle
where
    F: FnOnce(watch::Receiver<bool>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (cancel, receiver) = watch::channel(false);
    let task = tokio::spawn(body(receiver));
    TriggerHandle { cancel, task }
}

async fn hourly_trigger(
    sync: Arc<dyn SyncServiceTrait>,
    clock: ZonedClock,
    mut cancel: watch::Receiver<bool>,
) {
    let now = clock();
    let first = next_hour_boundary(&now);
    let delay = delay_until(&now, &first);
    info!(
        "[{}] first run at {} (in {}s)",
        TRIGGER_HOURLY,
        first.naive_local(),
        delay.as_secs()
    );

    let mut ticker = interval_at(Instant::now() + delay, HOURLY_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            _ = ticker.tick() => {}
        }
        run_values(sync.as_ref(), TRIGGER_HOURLY).await;
    }
    debug!("[{}] trigger exited", TRIGGER_HOURLY);
}

async fn midnight_trigger(
    sync: Arc<dyn SyncServiceTrait>,
    clock: ZonedClock,
    mut cancel: watch::Receiver<bool>,
) {
    loop {
        let now = clock();
        let next = next_midnight(&now);
        let delay = delay_until(&now, &next);
        info!(
            "[{}] next run at {} (in {}s)",
            TRIGGER_MIDNIGHT,
            next.naive_local(),
            delay.as_secs()
        );

        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            _ = sleep(delay) => {}
        }
        run_details(sync.as_ref(), TRIGGER_MIDNIGHT).await;
    }
    debug!("[{}] trigger exited", TRIGGER_MIDNIGHT);
}

async fn catch_up_trigger(
    sync: Arc<dyn SyncServiceTrait>,
    history: Arc<dyn HistoryStore>,
    clock: ZonedClock,
    cancel: watch::Receiver<bool>,
) {
    if *cancel.borrow() {
        return;
    }
    let now = clock().naive_local();
    if let Err(e) = run_catch_up(sync.as_ref(), history.as_ref(), now).await {
        error!("[{}] could not check sync state: {}", TRIGGER_CATCH_UP, e);
    }
}
