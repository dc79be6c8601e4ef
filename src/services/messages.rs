//! Titles and bodies for every reminder the engine can emit

use crate::engine::{DailyEvent, ReminderEvent, ReminderKind};
use super::exercises::{routine_for, Routine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub kind: String,
    pub title: String,
    pub message: String,
}

impl Presentation {
    fn new(kind: &str, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Routine shown in a dialog, either from a reminder or on demand
pub fn present_routine(routine: &Routine) -> Presentation {
    Presentation::new(
        routine.kind.as_str(),
        &format!("{} ({})", routine.title, routine.duration),
        routine.body(),
    )
}

fn periodic(kind: ReminderKind) -> Presentation {
    // routines replace the one-liners for kinds that ask for an exercise
    if matches!(
        kind,
        ReminderKind::NeckStretch
            | ReminderKind::EyeExercise
            | ReminderKind::Breathing
            | ReminderKind::Posture
    ) {
        if let Some(routine) = routine_for(kind) {
            return present_routine(&routine);
        }
    }

    let (title, message) = match kind {
        ReminderKind::Walk => ("Time to walk", "Stand up and walk around for 2-3 minutes."),
        ReminderKind::Water => ("Drink some water", "Have a glass of water to stay hydrated."),
        ReminderKind::Toilet => ("Toilet break", "Take a toilet break, don't hold it too long."),
        ReminderKind::Eye202020 => (
            "20-20-20",
            "Look at something 6 metres away for 20 seconds.",
        ),
        ReminderKind::Blink => ("Blink", "Blink 15-20 times to keep your eyes moist."),
        ReminderKind::Posture => (
            "Posture check",
            "Back straight, shoulders relaxed, feet flat on the floor.",
        ),
        ReminderKind::NeckStretch => (
            "Neck and shoulder stretch",
            "Take 2 minutes to stretch your neck and shoulders.",
        ),
        ReminderKind::EyeExercise => (
            "Eye exercise",
            "Alternate focus near and far, then roll your eyes slowly.",
        ),
        ReminderKind::Breathing => (
            "Breathe",
            "Breathe in for 4 seconds, hold for 4, out for 6. Repeat 5 times.",
        ),
    };
    Presentation::new(kind.as_str(), title, message)
}

fn daily(event: DailyEvent) -> Presentation {
    let (title, message) = match event {
        DailyEvent::Morning => ("Good morning", "The workday starts soon. Plan your first task."),
        DailyEvent::Lunch => ("Lunch time", "Grab your lunch and take a proper break."),
        DailyEvent::EndOfDay => ("Workday over", "Time to wrap up and head home."),
        DailyEvent::NightMode => (
            "Night mode",
            "Switch on night shift or dark mode to protect your eyes.",
        ),
        DailyEvent::Sleep => ("Bedtime", "Put the screens away and get some sleep."),
    };
    Presentation::new(event.as_str(), title, message)
}

pub fn present(event: &ReminderEvent) -> Presentation {
    match event {
        ReminderEvent::Periodic { kind } => periodic(*kind),
        ReminderEvent::Daily { event } => daily(*event),
        ReminderEvent::FocusStarted { minutes, .. } => Presentation::new(
            "focus",
            "Focus mode on",
            format!("Reminders and videos are paused for {} minutes.", minutes),
        ),
        ReminderEvent::FocusEnded => Presentation::new(
            "focus",
            "Focus session finished",
            "Nice work. Reminders are back on.",
        ),
        ReminderEvent::PomodoroStarted { .. } => Presentation::new(
            "pomodoro",
            "Pomodoro started",
            "Work session running. Reminders are paused until it ends.",
        ),
        ReminderEvent::PomodoroWorkEnded {
            completed_cycles,
            break_minutes,
            long_break,
        } => Presentation::new(
            "pomodoro",
            if *long_break { "Long break" } else { "Short break" },
            format!(
                "Work session {} done. Take {} minutes off.",
                completed_cycles, break_minutes
            ),
        ),
        ReminderEvent::PomodoroBreakEnded => Presentation::new(
            "pomodoro",
            "Break over",
            "Start the next Pomodoro when you're ready.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_break_is_announced_as_such() {
        let presentation = present(&ReminderEvent::PomodoroWorkEnded {
            completed_cycles: 4,
            break_minutes: 15,
            long_break: true,
        });
        assert_eq!(presentation.title, "Long break");
        assert!(presentation.message.contains("15 minutes"));
    }

    #[test]
    fn exercise_reminders_carry_the_routine() {
        let presentation = present(&ReminderEvent::Periodic {
            kind: ReminderKind::Breathing,
        });
        assert_eq!(presentation.title, "Breathing (2 minutes)");
        assert!(presentation.message.contains("1. 4-7-8"));

        let presentation = present(&ReminderEvent::Periodic {
            kind: ReminderKind::Water,
        });
        assert_eq!(presentation.title, "Drink some water");
    }

    #[test]
    fn periodic_kind_is_carried_through() {
        let presentation = present(&ReminderEvent::Periodic {
            kind: ReminderKind::Eye202020,
        });
        assert_eq!(presentation.kind, "eye_20_20_20");
    }
}
