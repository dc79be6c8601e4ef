//! Step-by-step exercise routines
//!
//! Shown with the reminders that ask the user to do something, and on
//! demand through POST /exercise/:kind.

use serde::{Deserialize, Serialize};

use crate::engine::ReminderKind;

struct Guide {
    title: &'static str,
    duration: &'static str,
    steps: &'static [&'static str],
}

const NECK: Guide = Guide {
    title: "Neck stretch",
    duration: "2 minutes",
    steps: &[
        "Tilt your head to the left, hold 15 seconds, breathe evenly",
        "Tilt your head to the right, hold 15 seconds",
        "Lower your chin to your chest, hold 15 seconds",
        "Gently tilt your head back, hold 10 seconds without straining",
        "Roll your neck slowly, 5 circles each direction",
    ],
};

const SHOULDERS: Guide = Guide {
    title: "Shoulder stretch",
    duration: "2 minutes",
    steps: &[
        "Shrug your shoulders up, hold 5 seconds, drop them; repeat 10 times",
        "Roll your shoulders 10 times forward and 10 times back",
        "Pull one arm across your chest, hold 15 seconds, switch sides",
        "Clasp your hands behind your back and open your chest for 15 seconds",
    ],
};

const EYES: Guide = Guide {
    title: "Eye exercise",
    duration: "2 minutes",
    steps: &[
        "Blink quickly 20 times",
        "Focus on a finger 30 cm away, then on something far away; repeat 10 times",
        "Trace a figure eight with your eyes, 5 times each direction",
        "Rub your palms warm and cup them over closed eyes for 30 seconds",
    ],
};

const BREATHING: Guide = Guide {
    title: "Breathing",
    duration: "2 minutes",
    steps: &[
        "4-7-8: breathe in through the nose for 4 seconds",
        "Hold for 7 seconds, breathe out through the mouth for 8; repeat 4 times",
        "Belly breathing: hand on your belly, let it rise as you breathe in",
        "Let it fall as you breathe out; 10 slow breaths",
    ],
};

const RULE_20_20_20: Guide = Guide {
    title: "20-20-20",
    duration: "20 seconds",
    steps: &["Look at something about 6 metres away", "Keep looking for 20 seconds"],
};

const POSTURE: Guide = Guide {
    title: "Posture check",
    duration: "30 seconds",
    steps: &[
        "Back straight against the chair",
        "Shoulders relaxed, not raised",
        "Elbows at 90 degrees",
        "Feet flat on the floor or a footrest",
        "Screen at eye level, 50-70 cm away",
        "Avoid craning your head forward or crossing your legs for long",
    ],
};

const BLINK: Guide = Guide {
    title: "Blink",
    duration: "30 seconds",
    steps: &[
        "Blink 15-20 times right now",
        "Keep your eyes closed for a second on each blink",
    ],
};

const STAND_UP: Guide = Guide {
    title: "Stand up",
    duration: "3 minutes",
    steps: &[
        "Stand up and stretch your arms overhead",
        "Walk a few steps: get water, visit the toilet",
        "Or stay in place and rise onto your toes a few times",
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub kind: ReminderKind,
    pub title: String,
    pub duration: String,
    pub steps: Vec<String>,
}

impl Routine {
    fn from_guides(kind: ReminderKind, title: &str, guides: &[&Guide]) -> Self {
        let duration = guides
            .iter()
            .map(|guide| guide.duration)
            .collect::<Vec<_>>()
            .join(" + ");
        let steps = guides
            .iter()
            .flat_map(|guide| guide.steps.iter().map(|step| step.to_string()))
            .collect();
        Self {
            kind,
            title: title.to_string(),
            duration,
            steps,
        }
    }

    /// Numbered steps, one per line
    pub fn body(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The routine that goes with `kind`, if it has one
pub fn routine_for(kind: ReminderKind) -> Option<Routine> {
    let routine = match kind {
        ReminderKind::NeckStretch => {
            Routine::from_guides(kind, "Neck and shoulder stretch", &[&NECK, &SHOULDERS])
        }
        ReminderKind::EyeExercise => Routine::from_guides(kind, EYES.title, &[&EYES]),
        ReminderKind::Breathing => Routine::from_guides(kind, BREATHING.title, &[&BREATHING]),
        ReminderKind::Posture => Routine::from_guides(kind, POSTURE.title, &[&POSTURE]),
        ReminderKind::Eye202020 => {
            Routine::from_guides(kind, RULE_20_20_20.title, &[&RULE_20_20_20])
        }
        ReminderKind::Blink => Routine::from_guides(kind, BLINK.title, &[&BLINK]),
        ReminderKind::Walk => Routine::from_guides(kind, STAND_UP.title, &[&STAND_UP]),
        ReminderKind::Water | ReminderKind::Toilet => return None,
    };
    Some(routine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neck_stretch_includes_shoulders() {
        let routine = routine_for(ReminderKind::NeckStretch).unwrap();
        assert_eq!(routine.steps.len(), NECK.steps.len() + SHOULDERS.steps.len());
        assert_eq!(routine.duration, "2 minutes + 2 minutes");
        assert!(routine.body().starts_with("1. Tilt your head to the left"));
    }

    #[test]
    fn plain_reminders_have_no_routine() {
        assert!(routine_for(ReminderKind::Water).is_none());
        assert!(routine_for(ReminderKind::Toilet).is_none());
    }
}
