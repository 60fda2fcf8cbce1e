//! Sync module - the upstream refresh jobs and the scheduler that fires them.

mod scheduler;
mod sync_model;
mod sync_service;

#[cfg(test)]
mod scheduler_tests;

pub use scheduler::{
    catch_up_plan, check_and_run_scheduled_tasks, CatchUpPlan, SchedulerHandle, SyncScheduler,
    ZonedClock,
};
pub use sync_model::{StockRefresh, SyncFailure, SyncJobKind, SyncSummary};
pub use sync_service::{CivilClock, SyncService, SyncServiceTrait};
