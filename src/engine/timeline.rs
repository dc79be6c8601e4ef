//! Today's fixed schedule as a checklist

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::schedule::{self, ClockTime, ScheduleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStep {
    WorkStart,
    LunchStart,
    LunchEnd,
    WorkEnd,
}

impl TimelineStep {
    pub fn label(&self) -> &'static str {
        match self {
            TimelineStep::WorkStart => "Start work",
            TimelineStep::LunchStart => "Lunch break",
            TimelineStep::LunchEnd => "Back to work",
            TimelineStep::WorkEnd => "End of the workday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStatus {
    Pending,
    /// The current minute is the step's minute
    Now,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub step: TimelineStep,
    pub time: ClockTime,
    pub label: String,
    pub status: TimelineStatus,
}

/// The day's schedule with each step marked against `now`.
///
/// Empty on days off; half days have no lunch steps and end early.
pub fn timeline(now: &DateTime<Local>, config: &ScheduleConfig) -> Vec<TimelineItem> {
    if !schedule::is_work_day(now, config) {
        return Vec::new();
    }

    let mut steps = vec![(TimelineStep::WorkStart, config.work_start)];
    if !schedule::is_half_day(now, config) {
        steps.push((TimelineStep::LunchStart, config.lunch_start));
        steps.push((TimelineStep::LunchEnd, config.lunch_end));
    }
    steps.push((TimelineStep::WorkEnd, schedule::work_end_for_today(now, config)));

    let current = schedule::minute_of_day(now);
    steps
        .into_iter()
        .map(|(step, time)| {
            let status = match current.cmp(&time.minutes()) {
                std::cmp::Ordering::Greater => TimelineStatus::Done,
                std::cmp::Ordering::Equal => TimelineStatus::Now,
                std::cmp::Ordering::Less => TimelineStatus::Pending,
            };
            TimelineItem {
                step,
                time,
                label: step.label().to_string(),
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schedule::WeekendMode;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, day, hour, minute, 0)
            .earliest()
            .expect("valid local time")
    }

    fn statuses(items: &[TimelineItem]) -> Vec<TimelineStatus> {
        items.iter().map(|item| item.status).collect()
    }

    #[test]
    fn steps_are_marked_against_the_clock() {
        let config = ScheduleConfig::default();

        let items = timeline(&at(6, 11, 30), &config);
        assert_eq!(
            statuses(&items),
            vec![
                TimelineStatus::Done,
                TimelineStatus::Now,
                TimelineStatus::Pending,
                TimelineStatus::Pending,
            ]
        );

        let items = timeline(&at(6, 18, 0), &config);
        assert!(items.iter().all(|item| item.status == TimelineStatus::Done));
    }

    #[test]
    fn half_day_has_no_lunch() {
        let config = ScheduleConfig {
            weekend_mode: WeekendMode::MonSatHalf,
            ..ScheduleConfig::default()
        };

        let items = timeline(&at(11, 9, 0), &config);
        let steps: Vec<_> = items.iter().map(|item| item.step).collect();
        assert_eq!(steps, vec![TimelineStep::WorkStart, TimelineStep::WorkEnd]);
        assert_eq!(items[1].time, config.saturday_end);
    }

    #[test]
    fn nothing_on_a_day_off() {
        assert!(timeline(&at(12, 10, 0), &ScheduleConfig::default()).is_empty());
    }
}
