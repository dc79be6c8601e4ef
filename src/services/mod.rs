//! External collaborators module
//!
//! Notification presentation, the reminder message and exercise catalogues,
//! and the loopback bridge to the browser video player.

pub mod exercises;
pub mod messages;
pub mod notifier;
pub mod video;

// Re-export main types
pub use exercises::{routine_for, Routine};
pub use messages::{present, present_routine, Presentation};
pub use notifier::{DesktopNotifier, LogNotifier, Notifier};
pub use video::{VideoBridge, VideoCommand, VideoControl};
