//! Focus and Pomodoro override sessions
//!
//! At most one session is active at a time. Starting either kind replaces
//! whatever was running (last writer wins). Natural transitions happen when
//! the reconciliation tick observes `now >= ends_at`:
//!
//! ```text
//! Focus ----------------------------------------------> None
//! PomodoroWork -> PomodoroBreak (short, or long every 4th) -> None
//! ```
//!
//! The completed Pomodoro count lives beside the session so it survives an
//! explicit stop; it only resets when the calendar day rolls over.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Completed work sessions between two long breaks
pub const LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
        }
    }
}

impl PomodoroSettings {
    /// Break length that follows the `completed_cycles`-th work session
    pub fn break_after(&self, completed_cycles: u32) -> (u32, bool) {
        if completed_cycles > 0 && completed_cycles % LONG_BREAK_EVERY == 0 {
            (self.long_break_minutes, true)
        } else {
            (self.break_minutes, false)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OverrideSession {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    Focus { ends_at: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    Pomodoro {
        phase: PomodoroPhase,
        ends_at: DateTime<Utc>,
    },
}

impl OverrideSession {
    pub fn is_active(&self) -> bool {
        !matches!(self, OverrideSession::None)
    }

    pub fn is_focus(&self) -> bool {
        matches!(self, OverrideSession::Focus { .. })
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        match self {
            OverrideSession::None => None,
            OverrideSession::Focus { ends_at } | OverrideSession::Pomodoro { ends_at, .. } => {
                Some(*ends_at)
            }
        }
    }

    /// Whole seconds left in the session, zero once it is due
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        self.ends_at()
            .map(|ends_at| (ends_at - now).num_seconds().max(0) as u64)
    }
}

/// Transition notifications produced by the override state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverrideTransition {
    FocusEnded,
    #[serde(rename_all = "camelCase")]
    PomodoroWorkEnded {
        completed_cycles: u32,
        break_minutes: u32,
        long_break: bool,
    },
    PomodoroBreakEnded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideState {
    pub session: OverrideSession,
    pub completed_cycles: u32,
    pub cycles_day: NaiveDate,
}

impl OverrideState {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            session: OverrideSession::None,
            completed_cycles: 0,
            cycles_day: day,
        }
    }

    /// Forget the Pomodoro count once the calendar day changes
    pub fn roll_over(&mut self, now: &DateTime<Local>) {
        let today = now.date_naive();
        if self.cycles_day != today {
            self.completed_cycles = 0;
            self.cycles_day = today;
        }
    }

    pub fn start_focus(&mut self, minutes: u32, now: DateTime<Utc>) {
        self.session = OverrideSession::Focus {
            ends_at: now + Duration::minutes(minutes as i64),
        };
    }

    pub fn stop_focus(&mut self) {
        self.session = OverrideSession::None;
    }

    pub fn start_pomodoro(&mut self, settings: &PomodoroSettings, now: DateTime<Utc>) {
        self.session = OverrideSession::Pomodoro {
            phase: PomodoroPhase::Work,
            ends_at: now + Duration::minutes(settings.work_minutes as i64),
        };
    }

    pub fn stop_pomodoro(&mut self) {
        self.session = OverrideSession::None;
    }

    /// Apply the natural transition that is due at `now`, if any.
    ///
    /// Breaks are timed from `now`, not from the missed deadline, so a
    /// process that was asleep through the end of a work phase still grants
    /// the full break.
    pub fn advance(
        &mut self,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Option<OverrideTransition> {
        match self.session {
            OverrideSession::None => None,
            OverrideSession::Focus { ends_at } if now >= ends_at => {
                self.session = OverrideSession::None;
                Some(OverrideTransition::FocusEnded)
            }
            OverrideSession::Pomodoro {
                phase: PomodoroPhase::Work,
                ends_at,
            } if now >= ends_at => {
                self.completed_cycles += 1;
                let (break_minutes, long_break) = settings.break_after(self.completed_cycles);
                self.session = OverrideSession::Pomodoro {
                    phase: PomodoroPhase::Break,
                    ends_at: now + Duration::minutes(break_minutes as i64),
                };
                Some(OverrideTransition::PomodoroWorkEnded {
                    completed_cycles: self.completed_cycles,
                    break_minutes,
                    long_break,
                })
            }
            OverrideSession::Pomodoro {
                phase: PomodoroPhase::Break,
                ends_at,
            } if now >= ends_at => {
                self.session = OverrideSession::None;
                Some(OverrideTransition::PomodoroBreakEnded)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
    }

    fn state() -> OverrideState {
        OverrideState::new(start().date_naive())
    }

    #[test]
    fn focus_expires_once() {
        let mut overrides = state();
        let settings = PomodoroSettings::default();
        let t = start();
        overrides.start_focus(25, t);

        assert_eq!(overrides.advance(&settings, t + Duration::minutes(24)), None);
        assert_eq!(
            overrides.session.remaining_seconds(t + Duration::minutes(24)),
            Some(60)
        );
        assert_eq!(
            overrides.advance(&settings, t + Duration::minutes(26)),
            Some(OverrideTransition::FocusEnded)
        );
        assert_eq!(overrides.advance(&settings, t + Duration::minutes(27)), None);
        assert!(!overrides.session.is_active());
    }

    #[test]
    fn every_fourth_cycle_earns_a_long_break() {
        let mut overrides = state();
        let settings = PomodoroSettings::default();
        let mut now = start();
        let mut breaks = Vec::new();

        for _ in 0..8 {
            overrides.start_pomodoro(&settings, now);
            now += Duration::minutes(25);
            match overrides.advance(&settings, now) {
                Some(OverrideTransition::PomodoroWorkEnded { break_minutes, .. }) => {
                    breaks.push(break_minutes)
                }
                other => panic!("unexpected transition {other:?}"),
            }
            now += Duration::minutes(breaks.last().copied().unwrap_or_default() as i64);
            assert_eq!(
                overrides.advance(&settings, now),
                Some(OverrideTransition::PomodoroBreakEnded)
            );
        }

        assert_eq!(breaks, vec![5, 5, 5, 15, 5, 5, 5, 15]);
    }

    #[test]
    fn break_is_timed_from_observation() {
        let mut overrides = state();
        let settings = PomodoroSettings::default();
        overrides.start_pomodoro(&settings, start());

        let late = start() + Duration::hours(2);
        overrides.advance(&settings, late);

        assert_eq!(
            overrides.session,
            OverrideSession::Pomodoro {
                phase: PomodoroPhase::Break,
                ends_at: late + Duration::minutes(5),
            }
        );
    }

    #[test]
    fn stop_keeps_the_cycle_count() {
        let mut overrides = state();
        let settings = PomodoroSettings::default();
        overrides.start_pomodoro(&settings, start());
        overrides.advance(&settings, start() + Duration::minutes(25));
        overrides.stop_pomodoro();

        assert_eq!(overrides.session, OverrideSession::None);
        assert_eq!(overrides.completed_cycles, 1);
    }

    #[test]
    fn focus_replaces_a_running_pomodoro() {
        let mut overrides = state();
        let settings = PomodoroSettings::default();
        overrides.start_pomodoro(&settings, start());
        overrides.start_focus(10, start());

        assert!(overrides.session.is_focus());
        assert_eq!(
            overrides.advance(&settings, start() + Duration::minutes(10)),
            Some(OverrideTransition::FocusEnded)
        );
        assert_eq!(overrides.completed_cycles, 0);
    }
}
