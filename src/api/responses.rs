//! API response structures

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{
        schedule, timeline, OverrideSession, ReminderEvent, ReminderKind, Settings, StatusView,
        TimelineItem,
    },
    services::{Routine, VideoCommand},
    state::{AppState, TickReport},
};

/// Everything the popup needs to render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: StatusView,
    pub paused: bool,
    pub is_work_day: bool,
    pub is_working: bool,
    pub work_progress_percent: f64,
    /// Today's fixed schedule with each step marked done, now or pending
    pub timeline: Vec<TimelineItem>,
    pub timers: BTreeMap<ReminderKind, u64>,
    pub next_reminder: Option<NextReminder>,
    pub override_session: OverrideSession,
    pub override_remaining_seconds: Option<u64>,
    pub completed_pomodoros: u32,
    /// When the browser content script last checked in
    pub video_last_report: Option<DateTime<Utc>>,
    pub config: Settings,
    /// Reminders fired by the tick that produced this response
    pub fired: Vec<ReminderEvent>,
    pub persisted: bool,
    pub errors: Vec<String>,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextReminder {
    pub kind: ReminderKind,
    pub remaining_seconds: u64,
}

impl StatusResponse {
    pub fn from_report(state: &AppState, report: TickReport, now: &DateTime<Local>) -> Self {
        let engine = report.state;
        let (last_action, last_action_time) = state.get_last_action();
        let counting =
            report.day.is_working && !engine.paused && !engine.overrides.session.is_active();
        let next_reminder = engine
            .timers
            .next_due()
            .filter(|_| counting)
            .map(|(kind, remaining_seconds)| NextReminder {
                kind,
                remaining_seconds,
            });

        Self {
            status: report.status,
            paused: engine.paused,
            is_work_day: report.day.is_work_day,
            is_working: report.day.is_working,
            work_progress_percent: schedule::work_progress_percent(now, &engine.settings.schedule),
            timeline: timeline::timeline(now, &engine.settings.schedule),
            timers: engine.timers.remaining.clone(),
            next_reminder,
            override_remaining_seconds: engine
                .overrides
                .session
                .remaining_seconds(now.with_timezone(&Utc)),
            override_session: engine.overrides.session,
            completed_pomodoros: engine.overrides.completed_cycles,
            video_last_report: state.video.last_report(),
            config: engine.settings,
            fired: report.events,
            persisted: report.persisted,
            errors: state.get_errors(),
            uptime: state.get_uptime(),
            last_action,
            last_action_time,
        }
    }
}

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StatusResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Routine>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: Option<StatusResponse>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
            exercise: None,
        }
    }

    /// Create a success response
    pub fn ok(message: String, state: StatusResponse) -> Self {
        Self::new("ok".to_string(), message, Some(state))
    }

    /// Attach the routine the user asked for
    pub fn with_exercise(mut self, routine: Routine) -> Self {
        self.exercise = Some(routine);
        self
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message, None)
    }
}

/// Request body for POST /focus/start
#[derive(Debug, Clone, Deserialize)]
pub struct FocusRequest {
    pub minutes: u32,
}

/// Request body for POST /video/report
#[derive(Debug, Clone, Deserialize)]
pub struct VideoReport {
    pub playing: bool,
}

/// Response for GET /video/command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCommandResponse {
    pub command: VideoCommand,
    pub blocked: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
