//! Workday schedule model
//!
//! Pure classification of a local timestamp against the configured weekly
//! schedule. All comparisons happen on minutes since local midnight; no
//! timezone conversion is performed beyond what the host clock reports.

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

/// A wall-clock time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight
    pub fn minutes(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Seconds since midnight
    pub fn seconds(&self) -> u32 {
        self.minutes() * 60
    }

    pub fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Which days of the week are work days, and whether the weekend ones are short
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendMode {
    #[default]
    MonFri,
    MonSatFull,
    MonSatHalf,
    MonSunFull,
    MonSunHalf,
}

/// Weekly schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub work_start: ClockTime,
    pub lunch_start: ClockTime,
    pub lunch_end: ClockTime,
    pub work_end: ClockTime,
    pub night_mode_start: ClockTime,
    pub sleep_reminder_time: ClockTime,
    pub morning_reminder_start: ClockTime,
    pub weekend_mode: WeekendMode,
    pub saturday_end: ClockTime,
    pub sunday_end: ClockTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            work_start: ClockTime::new(8, 0),
            lunch_start: ClockTime::new(11, 30),
            lunch_end: ClockTime::new(13, 0),
            work_end: ClockTime::new(17, 30),
            night_mode_start: ClockTime::new(18, 0),
            sleep_reminder_time: ClockTime::new(22, 30),
            morning_reminder_start: ClockTime::new(7, 30),
            weekend_mode: WeekendMode::MonFri,
            saturday_end: ClockTime::new(12, 0),
            sunday_end: ClockTime::new(12, 0),
        }
    }
}

/// Result of classifying one instant against the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayClassification {
    pub is_work_day: bool,
    pub is_half_day: bool,
    pub is_lunch: bool,
    pub is_working: bool,
    pub work_end_for_today: ClockTime,
    /// Minutes since local midnight of the classified instant
    pub minute_of_day: u32,
}

/// Monday = 0 ... Sunday = 6
fn weekday_index(now: &DateTime<Local>) -> u32 {
    now.weekday().num_days_from_monday()
}

pub fn minute_of_day(now: &DateTime<Local>) -> u32 {
    now.hour() * 60 + now.minute()
}

pub fn second_of_day(now: &DateTime<Local>) -> u32 {
    now.num_seconds_from_midnight()
}

pub fn is_work_day(now: &DateTime<Local>, config: &ScheduleConfig) -> bool {
    let day = weekday_index(now);
    match config.weekend_mode {
        WeekendMode::MonFri => day <= 4,
        WeekendMode::MonSatFull | WeekendMode::MonSatHalf => day <= 5,
        WeekendMode::MonSunFull | WeekendMode::MonSunHalf => true,
    }
}

pub fn is_half_day(now: &DateTime<Local>, config: &ScheduleConfig) -> bool {
    match (weekday_index(now), config.weekend_mode) {
        (5, WeekendMode::MonSatHalf) => true,
        (6, WeekendMode::MonSunHalf) => true,
        _ => false,
    }
}

pub fn work_end_for_today(now: &DateTime<Local>, config: &ScheduleConfig) -> ClockTime {
    if !is_half_day(now, config) {
        return config.work_end;
    }
    if weekday_index(now) == 5 {
        config.saturday_end
    } else {
        config.sunday_end
    }
}

pub fn is_lunch(now: &DateTime<Local>, config: &ScheduleConfig) -> bool {
    if !is_work_day(now, config) || is_half_day(now, config) {
        return false;
    }
    let current = minute_of_day(now);
    config.lunch_start.minutes() <= current && current < config.lunch_end.minutes()
}

pub fn is_working(now: &DateTime<Local>, config: &ScheduleConfig) -> bool {
    if !is_work_day(now, config) {
        return false;
    }
    let current = minute_of_day(now);
    let start = config.work_start.minutes();
    let end = work_end_for_today(now, config).minutes();

    if is_half_day(now, config) {
        return start <= current && current < end;
    }

    let morning = start <= current && current < config.lunch_start.minutes();
    let afternoon = config.lunch_end.minutes() <= current && current < end;
    morning || afternoon
}

pub fn classify(now: &DateTime<Local>, config: &ScheduleConfig) -> DayClassification {
    DayClassification {
        is_work_day: is_work_day(now, config),
        is_half_day: is_half_day(now, config),
        is_lunch: is_lunch(now, config),
        is_working: is_working(now, config),
        work_end_for_today: work_end_for_today(now, config),
        minute_of_day: minute_of_day(now),
    }
}

/// Share of today's working minutes already behind us, 0.0 ..= 100.0.
///
/// Lunch does not count as working time; half days run straight from
/// `work_start` to their shortened end.
pub fn work_progress_percent(now: &DateTime<Local>, config: &ScheduleConfig) -> f64 {
    if !is_work_day(now, config) {
        return 0.0;
    }
    let current = minute_of_day(now) as i64;
    let start = config.work_start.minutes() as i64;
    let end = work_end_for_today(now, config).minutes() as i64;

    let (total, worked) = if is_half_day(now, config) {
        (end - start, current.clamp(start, end) - start)
    } else {
        let lunch_start = config.lunch_start.minutes() as i64;
        let lunch_end = config.lunch_end.minutes() as i64;
        let morning = current.clamp(start, lunch_start) - start;
        let afternoon = current.clamp(lunch_end, end) - lunch_end;
        ((lunch_start - start) + (end - lunch_end), morning + afternoon)
    };

    if total <= 0 {
        return 0.0;
    }
    (worked as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        // January 2025: the 6th is a Monday, the 11th a Saturday, the 12th a Sunday
        Local
            .with_ymd_and_hms(2025, 1, day, hour, minute, 0)
            .earliest()
            .expect("valid local time")
    }

    #[test]
    fn lunch_window_is_not_working_time() {
        let config = ScheduleConfig::default();
        for (hour, minute) in [(11, 30), (12, 0), (12, 59)] {
            let now = at(6, hour, minute);
            assert!(is_lunch(&now, &config), "{hour}:{minute} should be lunch");
            assert!(!is_working(&now, &config), "{hour}:{minute} should not be working");
        }
        assert!(!is_lunch(&at(6, 13, 0), &config));
    }

    #[test]
    fn working_spans_morning_and_afternoon() {
        let config = ScheduleConfig::default();
        for (hour, minute) in [(8, 0), (11, 29), (13, 0), (17, 29)] {
            assert!(is_working(&at(6, hour, minute), &config));
        }
        assert!(!is_working(&at(6, 7, 59), &config));
        assert!(!is_working(&at(6, 17, 30), &config));
    }

    #[test]
    fn weekend_modes_select_work_days() {
        let mut config = ScheduleConfig::default();
        let saturday = at(11, 9, 0);
        let sunday = at(12, 9, 0);

        assert!(!is_work_day(&saturday, &config));
        assert!(!is_work_day(&sunday, &config));

        config.weekend_mode = WeekendMode::MonSatFull;
        assert!(is_work_day(&saturday, &config));
        assert!(!is_work_day(&sunday, &config));
        assert!(!is_half_day(&saturday, &config));

        config.weekend_mode = WeekendMode::MonSunHalf;
        assert!(is_work_day(&sunday, &config));
        assert!(is_half_day(&sunday, &config));
        assert!(!is_half_day(&saturday, &config));
    }

    #[test]
    fn saturday_half_day_ends_early_without_lunch() {
        let config = ScheduleConfig {
            weekend_mode: WeekendMode::MonSatHalf,
            saturday_end: ClockTime::new(12, 0),
            ..ScheduleConfig::default()
        };

        let before = classify(&at(11, 11, 59), &config);
        assert!(before.is_half_day);
        assert!(before.is_working);
        assert!(!before.is_lunch);
        assert_eq!(before.work_end_for_today, ClockTime::new(12, 0));

        let after = classify(&at(11, 12, 0), &config);
        assert!(!after.is_working);
        assert!(!after.is_lunch);
    }

    #[test]
    fn half_day_has_no_lunch_even_inside_the_window() {
        let config = ScheduleConfig {
            weekend_mode: WeekendMode::MonSatHalf,
            saturday_end: ClockTime::new(14, 0),
            ..ScheduleConfig::default()
        };
        let now = at(11, 12, 0);
        assert!(!is_lunch(&now, &config));
        assert!(is_working(&now, &config));
    }

    #[test]
    fn progress_excludes_lunch() {
        let config = ScheduleConfig::default();
        assert_eq!(work_progress_percent(&at(6, 7, 0), &config), 0.0);
        assert_eq!(work_progress_percent(&at(6, 18, 0), &config), 100.0);

        // 210 morning minutes out of 480 total, frozen across lunch
        let at_lunch = work_progress_percent(&at(6, 12, 15), &config);
        assert!((at_lunch - 43.75).abs() < 1e-9);
        assert_eq!(work_progress_percent(&at(6, 13, 0), &config), at_lunch);
    }
}
