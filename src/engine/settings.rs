//! Reminder settings and their validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::overrides::PomodoroSettings;
use super::schedule::{ClockTime, ScheduleConfig, WeekendMode};
use super::timers::{IntervalConfig, ReminderKind};

/// Rejected settings update; the previous settings stay in effect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is not a valid clock time ({value})")]
    InvalidClockTime { field: &'static str, value: String },

    #[error("schedule must satisfy workStart < lunchStart < lunchEnd < workEnd")]
    ScheduleOrder,

    #[error("{field} must not be earlier than workStart")]
    HalfDayBeforeStart { field: &'static str },

    #[error("interval for {0} must be a positive number of minutes")]
    ZeroInterval(ReminderKind),

    #[error("{0} must be a positive number of minutes")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub schedule: ScheduleConfig,
    pub intervals: IntervalConfig,
    pub pomodoro: PomodoroSettings,
    pub sound_enabled: bool,
    pub notification_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            intervals: IntervalConfig::default(),
            pomodoro: PomodoroSettings::default(),
            sound_enabled: true,
            notification_enabled: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.schedule;
        let clock_fields = [
            ("workStart", s.work_start),
            ("lunchStart", s.lunch_start),
            ("lunchEnd", s.lunch_end),
            ("workEnd", s.work_end),
            ("nightModeStart", s.night_mode_start),
            ("sleepReminderTime", s.sleep_reminder_time),
            ("morningReminderStart", s.morning_reminder_start),
            ("saturdayEnd", s.saturday_end),
            ("sundayEnd", s.sunday_end),
        ];
        for (field, value) in clock_fields {
            if !value.is_valid() {
                return Err(ConfigError::InvalidClockTime {
                    field,
                    value: format!("{}:{}", value.hour, value.minute),
                });
            }
        }

        let ordered = s.work_start < s.lunch_start
            && s.lunch_start < s.lunch_end
            && s.lunch_end < s.work_end;
        if !ordered {
            return Err(ConfigError::ScheduleOrder);
        }
        if s.saturday_end < s.work_start {
            return Err(ConfigError::HalfDayBeforeStart { field: "saturdayEnd" });
        }
        if s.sunday_end < s.work_start {
            return Err(ConfigError::HalfDayBeforeStart { field: "sundayEnd" });
        }

        if let Some(kind) = ReminderKind::ALL
            .into_iter()
            .find(|kind| self.intervals.minutes(*kind) == 0)
        {
            return Err(ConfigError::ZeroInterval(kind));
        }

        let p = &self.pomodoro;
        for (name, minutes) in [
            ("pomodoro work", p.work_minutes),
            ("pomodoro break", p.break_minutes),
            ("pomodoro long break", p.long_break_minutes),
        ] {
            if minutes == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }

    /// Merge `patch` over a copy of these settings and validate the result
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next.validate()?;
        Ok(next)
    }
}

/// Partial settings update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub work_start: Option<ClockTime>,
    pub lunch_start: Option<ClockTime>,
    pub lunch_end: Option<ClockTime>,
    pub work_end: Option<ClockTime>,
    pub night_mode_start: Option<ClockTime>,
    pub sleep_reminder_time: Option<ClockTime>,
    pub morning_reminder_start: Option<ClockTime>,
    pub weekend_mode: Option<WeekendMode>,
    pub saturday_end: Option<ClockTime>,
    pub sunday_end: Option<ClockTime>,
    pub intervals: Option<IntervalsPatch>,
    pub pomodoro: Option<PomodoroPatch>,
    pub sound_enabled: Option<bool>,
    pub notification_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervalsPatch {
    pub walk: Option<u32>,
    pub water: Option<u32>,
    pub toilet: Option<u32>,
    pub eye_20_20_20: Option<u32>,
    pub blink: Option<u32>,
    pub posture: Option<u32>,
    pub neck_stretch: Option<u32>,
    pub eye_exercise: Option<u32>,
    pub breathing: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroPatch {
    pub work_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl SettingsPatch {
    pub fn apply_to(&self, settings: &mut Settings) {
        let s = &mut settings.schedule;
        set(&mut s.work_start, self.work_start);
        set(&mut s.lunch_start, self.lunch_start);
        set(&mut s.lunch_end, self.lunch_end);
        set(&mut s.work_end, self.work_end);
        set(&mut s.night_mode_start, self.night_mode_start);
        set(&mut s.sleep_reminder_time, self.sleep_reminder_time);
        set(&mut s.morning_reminder_start, self.morning_reminder_start);
        set(&mut s.weekend_mode, self.weekend_mode);
        set(&mut s.saturday_end, self.saturday_end);
        set(&mut s.sunday_end, self.sunday_end);

        if let Some(intervals) = &self.intervals {
            let i = &mut settings.intervals;
            set(&mut i.walk, intervals.walk);
            set(&mut i.water, intervals.water);
            set(&mut i.toilet, intervals.toilet);
            set(&mut i.eye_20_20_20, intervals.eye_20_20_20);
            set(&mut i.blink, intervals.blink);
            set(&mut i.posture, intervals.posture);
            set(&mut i.neck_stretch, intervals.neck_stretch);
            set(&mut i.eye_exercise, intervals.eye_exercise);
            set(&mut i.breathing, intervals.breathing);
        }

        if let Some(pomodoro) = &self.pomodoro {
            let p = &mut settings.pomodoro;
            set(&mut p.work_minutes, pomodoro.work_minutes);
            set(&mut p.break_minutes, pomodoro.break_minutes);
            set(&mut p.long_break_minutes, pomodoro.long_break_minutes);
        }

        set(&mut settings.sound_enabled, self.sound_enabled);
        set(&mut settings.notification_enabled, self.notification_enabled);
    }
}
