//! Background sync scheduler wiring.
//!
//! Hourly price refresh, midnight detail refresh, and a catch-up run at
//! start when the stored history is stale.

use std::sync::Arc;
use tracing::info;

use stockhist_core::sync::{SchedulerHandle, SyncScheduler};

use crate::main_lib::AppState;

/// Starts every trigger on the current runtime.
pub fn start_sync_scheduler(state: &Arc<AppState>) -> SchedulerHandle {
    let scheduler = SyncScheduler::new(state.sync_service.clone(), state.history_store.clone());
    let handle = scheduler.start();
    info!(
        "Sync scheduler started with triggers: {}",
        handle.trigger_names().join(", ")
    );
    handle
}
