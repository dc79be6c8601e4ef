//! Reminder engine
//!
//! Schedule classification, periodic countdowns, once-a-day events and
//! override sessions, tied together by the reconciliation tick. Nothing in
//! here performs I/O.

pub mod daily;
pub mod overrides;
pub mod reconcile;
pub mod schedule;
pub mod settings;
pub mod status;
pub mod timeline;
pub mod timers;

// Re-export main types
pub use daily::{DailyEvent, DailyFlags};
pub use overrides::{OverrideSession, OverrideState, PomodoroPhase, PomodoroSettings};
pub use reconcile::{Action, EngineState, ReminderEvent, TickOutcome};
pub use schedule::{ClockTime, DayClassification, ScheduleConfig, WeekendMode};
pub use settings::{ConfigError, Settings, SettingsPatch};
pub use status::{StatusView, WorkStatus};
pub use timeline::{TimelineItem, TimelineStatus, TimelineStep};
pub use timers::{IntervalConfig, ReminderKind, TimerState};
