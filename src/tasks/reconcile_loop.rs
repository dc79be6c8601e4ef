//! Periodic reconciliation task

use std::{sync::Arc, time::Duration};
use chrono::Local;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::state::AppState;

/// How often the loop wakes up
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    /// Normal cadence
    pub tick: Duration,
    /// Cadence while Focus or Pomodoro is running, so session ends are noticed promptly
    pub override_tick: Duration,
}

impl Cadence {
    fn next(&self, override_active: bool) -> Duration {
        if override_active {
            self.override_tick.min(self.tick)
        } else {
            self.tick
        }
    }
}

/// Background task that ticks the engine forever.
///
/// The engine never relies on this cadence being regular: a missed or late
/// wake-up just means a larger elapsed span on the next tick.
pub async fn reconcile_task(state: Arc<AppState>, cadence: Cadence) {
    info!(
        "Starting reconcile task (every {}s, {}s during focus)",
        cadence.tick.as_secs(),
        cadence.override_tick.as_secs()
    );

    let mut last_wake = Local::now();
    let mut expected = Duration::ZERO;

    loop {
        let now = Local::now();
        let gap = (now - last_wake).num_seconds().max(0) as u64;
        if gap > expected.as_secs() * 2 + 5 {
            info!("Wake-up after {}s without a tick, catching up", gap);
        }
        last_wake = now;

        match state.reconcile(now) {
            Ok(report) => {
                if !report.events.is_empty() {
                    debug!("Tick fired {} reminder(s)", report.events.len());
                }
                expected = cadence.next(report.state.overrides.session.is_active());
            }
            Err(e) => {
                error!("Reconcile failed: {}", e);
                expected = cadence.next(state.has_active_override());
            }
        }

        sleep(expected).await;
    }
}
