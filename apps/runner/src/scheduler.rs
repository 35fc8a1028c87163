//! Periodic market analysis.
//!
//! Waits for the initial delay, then runs on a fixed interval. A tick that
//! fires while a run is still in progress is skipped.

use std::sync::Arc;
use std::time::Duration;

use tierfolio_core::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

pub fn start_market_analysis_scheduler(
    state: Arc<AppState>,
    initial_delay: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Market analysis scheduler started (first run in {:?}, then every {:?})",
            initial_delay, every
        );
        tokio::time::sleep(initial_delay).await;

        // First tick completes immediately.
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            run_scheduled_analysis(&state).await;
        }
    })
}

async fn run_scheduled_analysis(state: &Arc<AppState>) {
    info!("Running scheduled market analysis...");
    match state.pipeline.run_market_analysis().await {
        Ok(snapshot) => info!(
            "Scheduled market analysis completed: {} instruments in snapshot",
            snapshot.len()
        ),
        Err(Error::PipelineBusy) => warn!("Scheduled market analysis skipped: previous run still active"),
        Err(e) => warn!("Scheduled market analysis failed, keeping previous snapshot: {}", e),
    }
}
