//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/timers/reset", post(reset_all_handler))
        .route("/timers/:kind/reset", post(reset_timer_handler))
        .route("/exercise/:kind", post(exercise_handler))
        .route("/pause/toggle", post(toggle_pause_handler))
        .route("/config", put(update_config_handler))
        .route("/focus/start", post(focus_start_handler))
        .route("/focus/stop", post(focus_stop_handler))
        .route("/pomodoro/start", post(pomodoro_start_handler))
        .route("/pomodoro/stop", post(pomodoro_stop_handler))
        .route("/notify/test", post(notify_test_handler))
        // Browser content script bridge
        .route("/video/command", get(video_command_handler))
        .route("/video/report", post(video_report_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
