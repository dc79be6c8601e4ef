//! Derived work status shown to display surfaces

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::overrides::{OverrideSession, PomodoroPhase};
use super::schedule::{self, ScheduleConfig};

/// Listed from highest to lowest precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Paused,
    PomodoroWork,
    PomodoroBreak,
    Focus,
    Weekend,
    Lunch,
    Working,
    Ended,
    BeforeStart,
}

impl WorkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::Paused => "Paused",
            WorkStatus::PomodoroWork => "Pomodoro: focus",
            WorkStatus::PomodoroBreak => "Pomodoro: break",
            WorkStatus::Focus => "Focus mode",
            WorkStatus::Weekend => "Day off",
            WorkStatus::Lunch => "Lunch break",
            WorkStatus::Working => "Working",
            WorkStatus::Ended => "Workday over",
            WorkStatus::BeforeStart => "Not started yet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub status: WorkStatus,
    pub label: String,
    /// Seconds until the current status is expected to change, when known
    pub remaining_seconds: Option<u64>,
}

fn seconds_until(target_minutes: u32, now: &DateTime<Local>) -> u64 {
    (target_minutes as u64 * 60).saturating_sub(schedule::second_of_day(now) as u64)
}

pub fn derive_status(
    now: &DateTime<Local>,
    config: &ScheduleConfig,
    session: &OverrideSession,
    paused: bool,
) -> StatusView {
    let now_utc = now.with_timezone(&Utc);
    let session_remaining = session.remaining_seconds(now_utc);

    let (status, remaining_seconds) = if paused {
        (WorkStatus::Paused, None)
    } else if let OverrideSession::Pomodoro { phase, .. } = session {
        let status = match phase {
            PomodoroPhase::Work => WorkStatus::PomodoroWork,
            PomodoroPhase::Break => WorkStatus::PomodoroBreak,
        };
        (status, session_remaining)
    } else if session.is_focus() {
        (WorkStatus::Focus, session_remaining)
    } else if !schedule::is_work_day(now, config) {
        (WorkStatus::Weekend, None)
    } else if schedule::is_lunch(now, config) {
        (
            WorkStatus::Lunch,
            Some(seconds_until(config.lunch_end.minutes(), now)),
        )
    } else if schedule::is_working(now, config) {
        let current = schedule::minute_of_day(now);
        let boundary = if !schedule::is_half_day(now, config) && current < config.lunch_start.minutes() {
            config.lunch_start
        } else {
            schedule::work_end_for_today(now, config)
        };
        (WorkStatus::Working, Some(seconds_until(boundary.minutes(), now)))
    } else if schedule::minute_of_day(now) >= schedule::work_end_for_today(now, config).minutes() {
        (WorkStatus::Ended, None)
    } else {
        (
            WorkStatus::BeforeStart,
            Some(seconds_until(config.work_start.minutes(), now)),
        )
    };

    StatusView {
        status,
        label: status.label().to_string(),
        remaining_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, day, hour, minute, 0)
            .earliest()
            .expect("valid local time")
    }

    #[test]
    fn follows_the_schedule_without_overrides() {
        let config = ScheduleConfig::default();
        let none = OverrideSession::None;
        let status = |now: DateTime<Local>| derive_status(&now, &config, &none, false).status;

        assert_eq!(status(at(6, 7, 0)), WorkStatus::BeforeStart);
        assert_eq!(status(at(6, 9, 0)), WorkStatus::Working);
        assert_eq!(status(at(6, 11, 30)), WorkStatus::Lunch);
        assert_eq!(status(at(6, 17, 30)), WorkStatus::Ended);
        assert_eq!(status(at(11, 9, 0)), WorkStatus::Weekend);
    }

    #[test]
    fn lunch_reports_time_until_it_ends() {
        let view = derive_status(
            &at(6, 12, 30),
            &ScheduleConfig::default(),
            &OverrideSession::None,
            false,
        );
        assert_eq!(view.remaining_seconds, Some(30 * 60));
        assert_eq!(view.label, "Lunch break");
    }

    #[test]
    fn precedence_is_pause_pomodoro_focus_then_schedule() {
        let config = ScheduleConfig::default();
        let now = at(11, 9, 0);
        let ends_at = now.with_timezone(&Utc) + Duration::minutes(10);
        let focus = OverrideSession::Focus { ends_at };
        let pomodoro = OverrideSession::Pomodoro {
            phase: PomodoroPhase::Break,
            ends_at,
        };

        assert_eq!(derive_status(&now, &config, &pomodoro, true).status, WorkStatus::Paused);
        assert_eq!(
            derive_status(&now, &config, &pomodoro, false).status,
            WorkStatus::PomodoroBreak
        );
        let view = derive_status(&now, &config, &focus, false);
        assert_eq!(view.status, WorkStatus::Focus);
        assert_eq!(view.remaining_seconds, Some(600));
    }
}
