//! Focus guard background task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::time::interval;
use tracing::info;

use crate::{services::VideoControl, state::AppState};

/// Background task that keeps videos paused for as long as Focus is active
pub async fn focus_guard_task(state: Arc<AppState>, every: Duration) {
    info!("Starting focus guard task (every {}s)", every.as_secs());

    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let blocked = state.is_video_blocked(Utc::now());
        state.video.enforce(blocked);
    }
}
