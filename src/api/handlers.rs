//! HTTP endpoint handlers
//!
//! Every handler except health and the video bridge runs the reconcile
//! critical section first, so the popup always sees state that is current
//! as of the request.

use std::{sync::Arc, time::Duration};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Local;
use tracing::{error, info, warn};

use crate::{
    engine::{Action, ReminderKind, SettingsPatch},
    error::AppError,
    services::routine_for,
    state::AppState,
    tasks::event_dispatch::{send_routine, send_test_notification},
};
use super::responses::{
    ApiResponse, FocusRequest, HealthResponse, StatusResponse, VideoCommandResponse, VideoReport,
};

type HandlerResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

const PRESENT_LIMIT: Duration = Duration::from_secs(5);

fn failure(action: &str, e: AppError) -> (StatusCode, Json<ApiResponse>) {
    let code = if e.is_rejection() {
        warn!("Rejected {}: {}", action, e);
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        error!("Failed to {}: {}", action, e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(ApiResponse::error(e.to_string())))
}

/// Tick, apply `action` and wrap the result
fn respond(state: &AppState, action: Action, message: String) -> HandlerResult {
    let now = Local::now();
    let name = action.name();
    match state.perform(action, now) {
        Ok(report) => {
            info!("{} endpoint called", name);
            Ok(Json(ApiResponse::ok(
                message,
                StatusResponse::from_report(state, report, &now),
            )))
        }
        Err(e) => Err(failure(name, e)),
    }
}

/// Handle GET /status - Reconcile and report the full state
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ApiResponse>)> {
    let now = Local::now();
    match state.reconcile(now) {
        Ok(report) => Ok(Json(StatusResponse::from_report(&state, report, &now))),
        Err(e) => Err(failure("reconcile", e)),
    }
}

/// Handle POST /timers/reset - Re-arm every countdown
pub async fn reset_all_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    respond(&state, Action::ResetAll, "All timers reset".to_string())
}

/// Handle POST /timers/:kind/reset - Re-arm one countdown
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> HandlerResult {
    let Some(kind) = ReminderKind::from_name(&kind) else {
        warn!("Unknown reminder kind: {}", kind);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown reminder kind: {}", kind))),
        ));
    };
    respond(&state, Action::ResetTimer(kind), format!("Timer {} reset", kind))
}

/// Handle POST /exercise/:kind - Show a routine now and re-arm its reminder
pub async fn exercise_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> HandlerResult {
    let Some(routine) = ReminderKind::from_name(&kind).and_then(routine_for) else {
        warn!("No exercise for: {}", kind);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("No exercise for: {}", kind))),
        ));
    };

    let response = respond(
        &state,
        Action::CompleteExercise(routine.kind),
        format!("{} started", routine.title),
    )?;

    let notifier = Arc::clone(&state.notifier);
    let shown = routine.clone();
    tokio::spawn(async move {
        if let Err(e) = send_routine(notifier, &shown, PRESENT_LIMIT).await {
            warn!("Failed to show exercise: {}", e);
        }
    });

    Ok(Json(response.0.with_exercise(routine)))
}

/// Handle POST /pause/toggle - Pause or resume all reminders
pub async fn toggle_pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    respond(&state, Action::TogglePause, "Pause toggled".to_string())
}

/// Handle PUT /config - Merge and validate a partial settings update
pub async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> HandlerResult {
    respond(&state, Action::UpdateSettings(patch), "Settings updated".to_string())
}

/// Handle POST /focus/start - Start a Focus session
pub async fn focus_start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FocusRequest>,
) -> HandlerResult {
    respond(
        &state,
        Action::StartFocus {
            minutes: request.minutes,
        },
        format!("Focus started for {} minutes", request.minutes),
    )
}

/// Handle POST /focus/stop - End the Focus session early
pub async fn focus_stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    respond(&state, Action::StopFocus, "Focus stopped".to_string())
}

/// Handle POST /pomodoro/start - Start a Pomodoro work phase
pub async fn pomodoro_start_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    respond(&state, Action::StartPomodoro, "Pomodoro started".to_string())
}

/// Handle POST /pomodoro/stop - Abandon the Pomodoro session
pub async fn pomodoro_stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    respond(&state, Action::StopPomodoro, "Pomodoro stopped".to_string())
}

/// Handle POST /notify/test - Show a sample reminder
pub async fn notify_test_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let now = Local::now();
    let report = state.reconcile(now).map_err(|e| failure("reconcile", e))?;

    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        if let Err(e) = send_test_notification(notifier, PRESENT_LIMIT).await {
            warn!("Test notification failed: {}", e);
        }
    });

    Ok(Json(ApiResponse::ok(
        "Test notification sent".to_string(),
        StatusResponse::from_report(&state, report, &now),
    )))
}

/// Handle GET /video/command - Next command for the browser content script
pub async fn video_command_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VideoCommandResponse>, StatusCode> {
    match state.video.take_command() {
        Ok((command, blocked)) => Ok(Json(VideoCommandResponse { command, blocked })),
        Err(e) => {
            error!("{}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /video/report - Playback state from the browser content script
pub async fn video_report_handler(
    State(state): State<Arc<AppState>>,
    Json(report): Json<VideoReport>,
) -> StatusCode {
    match state.video.report(report.playing) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
