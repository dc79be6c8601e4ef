//! Periodic reminder countdowns

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a periodic reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Walk,
    Water,
    Toilet,
    #[serde(rename = "eye_20_20_20")]
    Eye202020,
    Blink,
    Posture,
    NeckStretch,
    EyeExercise,
    Breathing,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 9] = [
        ReminderKind::Walk,
        ReminderKind::Water,
        ReminderKind::Toilet,
        ReminderKind::Eye202020,
        ReminderKind::Blink,
        ReminderKind::Posture,
        ReminderKind::NeckStretch,
        ReminderKind::EyeExercise,
        ReminderKind::Breathing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Walk => "walk",
            ReminderKind::Water => "water",
            ReminderKind::Toilet => "toilet",
            ReminderKind::Eye202020 => "eye_20_20_20",
            ReminderKind::Blink => "blink",
            ReminderKind::Posture => "posture",
            ReminderKind::NeckStretch => "neck_stretch",
            ReminderKind::EyeExercise => "eye_exercise",
            ReminderKind::Breathing => "breathing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reminder intervals in minutes, one entry per kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    pub walk: u32,
    pub water: u32,
    pub toilet: u32,
    pub eye_20_20_20: u32,
    pub blink: u32,
    pub posture: u32,
    pub neck_stretch: u32,
    pub eye_exercise: u32,
    pub breathing: u32,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            walk: 30,
            water: 45,
            toilet: 60,
            eye_20_20_20: 20,
            blink: 15,
            posture: 45,
            neck_stretch: 60,
            eye_exercise: 90,
            breathing: 120,
        }
    }
}

impl IntervalConfig {
    pub fn minutes(&self, kind: ReminderKind) -> u32 {
        match kind {
            ReminderKind::Walk => self.walk,
            ReminderKind::Water => self.water,
            ReminderKind::Toilet => self.toilet,
            ReminderKind::Eye202020 => self.eye_20_20_20,
            ReminderKind::Blink => self.blink,
            ReminderKind::Posture => self.posture,
            ReminderKind::NeckStretch => self.neck_stretch,
            ReminderKind::EyeExercise => self.eye_exercise,
            ReminderKind::Breathing => self.breathing,
        }
    }

    pub fn seconds(&self, kind: ReminderKind) -> u64 {
        self.minutes(kind) as u64 * 60
    }
}

/// Remaining seconds per reminder kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub remaining: BTreeMap<ReminderKind, u64>,
    pub last_observed_at: DateTime<Utc>,
}

impl TimerState {
    /// Every countdown armed with its full interval
    pub fn full(intervals: &IntervalConfig, now: DateTime<Utc>) -> Self {
        let remaining = ReminderKind::ALL
            .into_iter()
            .map(|kind| (kind, intervals.seconds(kind)))
            .collect();
        Self {
            remaining,
            last_observed_at: now,
        }
    }

    pub fn remaining_seconds(&self, kind: ReminderKind) -> Option<u64> {
        self.remaining.get(&kind).copied()
    }

    /// Count every kind down by `elapsed_seconds` and rearm the ones that hit zero.
    ///
    /// Nothing moves unless `counting` is set; time spent paused, outside
    /// working hours or under an override session is dropped, not banked.
    /// A kind fires at most once per call even when the gap covers several
    /// of its periods.
    pub fn advance(
        &mut self,
        elapsed_seconds: u64,
        intervals: &IntervalConfig,
        counting: bool,
    ) -> Vec<ReminderKind> {
        let mut fired = Vec::new();
        if !counting {
            return fired;
        }

        for kind in ReminderKind::ALL {
            let full = intervals.seconds(kind);
            let remaining = self.remaining.entry(kind).or_insert(full);
            *remaining = remaining.saturating_sub(elapsed_seconds);
            if *remaining == 0 {
                fired.push(kind);
                *remaining = full;
            }
        }
        fired
    }

    pub fn reset(&mut self, kind: ReminderKind, intervals: &IntervalConfig, now: DateTime<Utc>) {
        self.remaining.insert(kind, intervals.seconds(kind));
        self.last_observed_at = now;
    }

    pub fn reset_all(&mut self, intervals: &IntervalConfig, now: DateTime<Utc>) {
        *self = Self::full(intervals, now);
    }

    /// Pull every countdown back under its (possibly shortened) interval
    pub fn clamp_to(&mut self, intervals: &IntervalConfig) {
        for kind in ReminderKind::ALL {
            let full = intervals.seconds(kind);
            let remaining = self.remaining.entry(kind).or_insert(full);
            if *remaining > full {
                *remaining = full;
            }
        }
    }

    /// The kind closest to firing
    pub fn next_due(&self) -> Option<(ReminderKind, u64)> {
        self.remaining
            .iter()
            .min_by_key(|(_, remaining)| **remaining)
            .map(|(kind, remaining)| (*kind, *remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timers() -> (TimerState, IntervalConfig) {
        let intervals = IntervalConfig::default();
        (TimerState::full(&intervals, Utc::now()), intervals)
    }

    #[test]
    fn fires_and_rearms_in_the_same_step() {
        let (mut state, intervals) = timers();
        state.remaining.insert(ReminderKind::Walk, 5);

        let fired = state.advance(10, &intervals, true);

        assert_eq!(fired, vec![ReminderKind::Walk]);
        assert_eq!(state.remaining_seconds(ReminderKind::Walk), Some(1800));
        assert_eq!(state.remaining_seconds(ReminderKind::Water), Some(45 * 60 - 10));
    }

    #[test]
    fn long_gap_fires_each_kind_once() {
        let (mut state, intervals) = timers();

        let fired = state.advance(45 * 60, &intervals, true);

        assert_eq!(
            fired,
            vec![
                ReminderKind::Walk,
                ReminderKind::Water,
                ReminderKind::Eye202020,
                ReminderKind::Blink,
                ReminderKind::Posture,
            ]
        );
        assert_eq!(state.remaining_seconds(ReminderKind::Walk), Some(1800));
        assert_eq!(state.remaining_seconds(ReminderKind::Toilet), Some(15 * 60));
    }

    #[test]
    fn gated_time_is_discarded() {
        let (mut state, intervals) = timers();
        let before = state.clone();

        assert!(state.advance(10_000, &intervals, false).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn remaining_stays_within_interval() {
        let (mut state, intervals) = timers();
        for step in [1, 59, 600, 1799, 3600, 0, 7200] {
            state.advance(step, &intervals, true);
            for kind in ReminderKind::ALL {
                let remaining = state.remaining_seconds(kind).unwrap_or_default();
                assert!(remaining > 0 && remaining <= intervals.seconds(kind));
            }
        }
    }

    #[test]
    fn shortened_interval_clamps_remaining() {
        let (mut state, mut intervals) = timers();
        intervals.walk = 10;
        state.clamp_to(&intervals);
        assert_eq!(state.remaining_seconds(ReminderKind::Walk), Some(600));
        assert_eq!(state.remaining_seconds(ReminderKind::Water), Some(45 * 60));
    }

    #[test]
    fn kind_names_round_trip_through_serde() {
        let json = serde_json::to_string(&ReminderKind::Eye202020).unwrap();
        assert_eq!(json, "\"eye_20_20_20\"");
        assert_eq!(ReminderKind::from_name("neck_stretch"), Some(ReminderKind::NeckStretch));
        assert_eq!(ReminderKind::from_name("nap"), None);
    }
}
