//! Fixed-time reminders that fire at most once per calendar day

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::schedule::{self, ScheduleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyEvent {
    Morning,
    Lunch,
    EndOfDay,
    NightMode,
    Sleep,
}

impl DailyEvent {
    pub const ALL: [DailyEvent; 5] = [
        DailyEvent::Morning,
        DailyEvent::Lunch,
        DailyEvent::EndOfDay,
        DailyEvent::NightMode,
        DailyEvent::Sleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyEvent::Morning => "morning",
            DailyEvent::Lunch => "lunch",
            DailyEvent::EndOfDay => "end_of_day",
            DailyEvent::NightMode => "night_mode",
            DailyEvent::Sleep => "sleep",
        }
    }

    /// Whether the event is due at `now`, ignoring whether it already fired
    fn is_due(&self, now: &DateTime<Local>, config: &ScheduleConfig) -> bool {
        let current = schedule::minute_of_day(now);
        match self {
            DailyEvent::Morning => {
                schedule::is_work_day(now, config)
                    && config.morning_reminder_start.minutes() <= current
                    && current < config.work_start.minutes()
            }
            DailyEvent::Lunch => schedule::is_lunch(now, config),
            DailyEvent::EndOfDay => {
                schedule::is_work_day(now, config)
                    && current >= schedule::work_end_for_today(now, config).minutes()
            }
            DailyEvent::NightMode => current >= config.night_mode_start.minutes(),
            DailyEvent::Sleep => current >= config.sleep_reminder_time.minutes(),
        }
    }
}

/// Which one-shot events already fired on `day`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlags {
    pub day: NaiveDate,
    pub morning_shown: bool,
    pub lunch_shown: bool,
    pub end_shown: bool,
    pub night_mode_shown: bool,
    pub sleep_shown: bool,
}

impl DailyFlags {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            morning_shown: false,
            lunch_shown: false,
            end_shown: false,
            night_mode_shown: false,
            sleep_shown: false,
        }
    }

    fn flag_mut(&mut self, event: DailyEvent) -> &mut bool {
        match event {
            DailyEvent::Morning => &mut self.morning_shown,
            DailyEvent::Lunch => &mut self.lunch_shown,
            DailyEvent::EndOfDay => &mut self.end_shown,
            DailyEvent::NightMode => &mut self.night_mode_shown,
            DailyEvent::Sleep => &mut self.sleep_shown,
        }
    }

    pub fn is_shown(&self, event: DailyEvent) -> bool {
        match event {
            DailyEvent::Morning => self.morning_shown,
            DailyEvent::Lunch => self.lunch_shown,
            DailyEvent::EndOfDay => self.end_shown,
            DailyEvent::NightMode => self.night_mode_shown,
            DailyEvent::Sleep => self.sleep_shown,
        }
    }

    /// Clear every flag if `now` is on a later (or earlier) day than the one recorded.
    ///
    /// Returns true when a rollover happened. Safe to call on any tick,
    /// however long after midnight it runs.
    pub fn roll_over(&mut self, now: &DateTime<Local>) -> bool {
        let today = now.date_naive();
        if self.day == today {
            return false;
        }
        *self = Self::new(today);
        true
    }

    /// Fire every event that is due and not yet shown today.
    ///
    /// Flags are set here, before the caller does anything with the result.
    pub fn advance(&mut self, now: &DateTime<Local>, config: &ScheduleConfig) -> Vec<DailyEvent> {
        self.roll_over(now);

        let mut fired = Vec::new();
        for event in DailyEvent::ALL {
            if self.is_shown(event) || !event.is_due(now, config) {
                continue;
            }
            *self.flag_mut(event) = true;
            fired.push(event);
        }
        fired
    }
}
