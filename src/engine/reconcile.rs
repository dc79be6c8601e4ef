//! Reconciliation tick
//!
//! One tick takes the last committed [`EngineState`] and a wall-clock
//! instant, and produces the next state plus every reminder that became due
//! in between. The elapsed time may be anything from zero to days: the host
//! can be suspended for arbitrary periods, so nothing here assumes a fixed
//! cadence and the work done per tick does not depend on the gap length.
//!
//! Ticks are pure. Persisting the result and presenting the events is the
//! caller's job, in that order.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::daily::{DailyEvent, DailyFlags};
use super::overrides::{OverrideState, OverrideTransition};
use super::schedule::{self, DayClassification};
use super::settings::{ConfigError, Settings, SettingsPatch};
use super::status::{self, StatusView};
use super::timers::{ReminderKind, TimerState};

/// Everything the engine persists between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub settings: Settings,
    pub timers: TimerState,
    pub daily: DailyFlags,
    pub overrides: OverrideState,
    pub paused: bool,
}

/// Something the presentation side should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReminderEvent {
    Periodic {
        kind: ReminderKind,
    },
    Daily {
        event: DailyEvent,
    },
    #[serde(rename_all = "camelCase")]
    FocusStarted {
        minutes: u32,
        ends_at: DateTime<Utc>,
    },
    FocusEnded,
    #[serde(rename_all = "camelCase")]
    PomodoroStarted {
        ends_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PomodoroWorkEnded {
        completed_cycles: u32,
        break_minutes: u32,
        long_break: bool,
    },
    PomodoroBreakEnded,
}

impl From<OverrideTransition> for ReminderEvent {
    fn from(transition: OverrideTransition) -> Self {
        match transition {
            OverrideTransition::FocusEnded => ReminderEvent::FocusEnded,
            OverrideTransition::PomodoroWorkEnded {
                completed_cycles,
                break_minutes,
                long_break,
            } => ReminderEvent::PomodoroWorkEnded {
                completed_cycles,
                break_minutes,
                long_break,
            },
            OverrideTransition::PomodoroBreakEnded => ReminderEvent::PomodoroBreakEnded,
        }
    }
}

/// User actions applied on top of a tick
#[derive(Debug, Clone)]
pub enum Action {
    ResetTimer(ReminderKind),
    /// The user did the routine for `kind` on demand
    CompleteExercise(ReminderKind),
    ResetAll,
    TogglePause,
    UpdateSettings(SettingsPatch),
    StartFocus { minutes: u32 },
    StopFocus,
    StartPomodoro,
    StopPomodoro,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ResetTimer(_) => "reset-timer",
            Action::CompleteExercise(_) => "exercise",
            Action::ResetAll => "reset-all",
            Action::TogglePause => "toggle-pause",
            Action::UpdateSettings(_) => "update-config",
            Action::StartFocus { .. } => "focus-start",
            Action::StopFocus => "focus-stop",
            Action::StartPomodoro => "pomodoro-start",
            Action::StopPomodoro => "pomodoro-stop",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub state: EngineState,
    pub events: Vec<ReminderEvent>,
    pub day: DayClassification,
    pub status: StatusView,
    pub elapsed_seconds: u64,
}

impl EngineState {
    /// First-run state: every countdown full, nothing fired today
    pub fn new(settings: Settings, now: DateTime<Local>) -> Self {
        let today = now.date_naive();
        let timers = TimerState::full(&settings.intervals, now.with_timezone(&Utc));
        Self {
            settings,
            timers,
            daily: DailyFlags::new(today),
            overrides: OverrideState::new(today),
            paused: false,
        }
    }

    pub fn status(&self, now: &DateTime<Local>) -> StatusView {
        status::derive_status(now, &self.settings.schedule, &self.overrides.session, self.paused)
    }

    /// Advance everything from `timers.last_observed_at` up to `now`.
    ///
    /// Order matters: overrides first so that a Focus ending on this tick
    /// still counts as active for the countdowns, then daily events, then
    /// the periodic countdowns.
    pub fn tick(&self, now: DateTime<Local>) -> TickOutcome {
        let now_utc = now.with_timezone(&Utc);
        let mut next = self.clone();
        let mut events = Vec::new();

        // a clock that moved backwards counts as no time passing
        let elapsed_seconds = (now_utc - self.timers.last_observed_at)
            .num_seconds()
            .max(0) as u64;
        let day = schedule::classify(&now, &next.settings.schedule);

        let override_was_active = next.overrides.session.is_active();
        next.overrides.roll_over(&now);
        if let Some(transition) = next.overrides.advance(&next.settings.pomodoro, now_utc) {
            events.push(transition.into());
        }

        if next.paused {
            next.daily.roll_over(&now);
        } else {
            events.extend(
                next.daily
                    .advance(&now, &next.settings.schedule)
                    .into_iter()
                    .map(|event| ReminderEvent::Daily { event }),
            );
        }

        let counting = day.is_working
            && !next.paused
            && !override_was_active
            && !next.overrides.session.is_active();
        events.extend(
            next.timers
                .advance(elapsed_seconds, &next.settings.intervals, counting)
                .into_iter()
                .map(|kind| ReminderEvent::Periodic { kind }),
        );
        next.timers.last_observed_at = now_utc;

        let status = next.status(&now);
        TickOutcome {
            state: next,
            events,
            day,
            status,
            elapsed_seconds,
        }
    }

    /// Apply a user action to an already reconciled state
    pub fn apply(
        &mut self,
        action: &Action,
        now: DateTime<Local>,
    ) -> Result<Vec<ReminderEvent>, ConfigError> {
        let now_utc = now.with_timezone(&Utc);
        let mut events = Vec::new();

        match action {
            Action::ResetTimer(kind) | Action::CompleteExercise(kind) => {
                self.timers.reset(*kind, &self.settings.intervals, now_utc);
            }
            Action::ResetAll => {
                self.timers.reset_all(&self.settings.intervals, now_utc);
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                if !self.paused {
                    self.timers.reset_all(&self.settings.intervals, now_utc);
                }
            }
            Action::UpdateSettings(patch) => {
                self.settings = self.settings.merged(patch)?;
                self.timers.clamp_to(&self.settings.intervals);
            }
            Action::StartFocus { minutes } => {
                if *minutes == 0 {
                    return Err(ConfigError::ZeroDuration("focus"));
                }
                self.overrides.start_focus(*minutes, now_utc);
                if let Some(ends_at) = self.overrides.session.ends_at() {
                    events.push(ReminderEvent::FocusStarted {
                        minutes: *minutes,
                        ends_at,
                    });
                }
            }
            Action::StopFocus => self.overrides.stop_focus(),
            Action::StartPomodoro => {
                self.overrides.start_pomodoro(&self.settings.pomodoro, now_utc);
                if let Some(ends_at) = self.overrides.session.ends_at() {
                    events.push(ReminderEvent::PomodoroStarted { ends_at });
                }
            }
            Action::StopPomodoro => self.overrides.stop_pomodoro(),
        }
        Ok(events)
    }
}
