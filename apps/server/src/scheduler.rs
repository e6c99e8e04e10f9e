//! Background scheduler for the monthly remote pull.
//!
//! Checks once a day and, the first time it runs in a new calendar month,
//! pulls the previous month for every entity with a remote source.

use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use tidecast_core::update::UpdateStatus;
use tidecast_core::utils::time_utils::CalendarMonth;

use crate::main_lib::AppState;

/// Check interval: once a day
const CHECK_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Initial delay before the first check (let the bootstrap retrain finish)
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the background monthly pull scheduler.
pub fn start_monthly_pull_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Monthly pull scheduler started (daily check)");
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut check_interval = interval(Duration::from_secs(CHECK_INTERVAL_SECS));
        let mut last_run: Option<CalendarMonth> = None;

        loop {
            check_interval.tick().await;
            let current = CalendarMonth::containing(Utc::now().date_naive());
            if last_run == Some(current) {
                continue;
            }
            run_monthly_pull(&state, current.previous()).await;
            last_run = Some(current);
        }
    });
}

/// Pulls `month` for every sourced entity and logs each outcome.
pub async fn run_monthly_pull(state: &Arc<AppState>, month: CalendarMonth) {
    info!("Running monthly pull for {}", month);
    let results = state.orchestrator.pull_all(month).await;
    for (entity, outcome) in &results {
        if outcome.success {
            info!("{}: {}", entity, outcome.message);
        } else if outcome.status == UpdateStatus::NotConfigured {
            warn!("{}: {}", entity, outcome.message);
        } else {
            warn!("{} failed: {}", entity, outcome.message);
        }
    }
    info!("Monthly pull for {} finished ({} entities)", month, results.len());
}
