//! Health Reminder - A local daemon that tracks the workday and fires wellness reminders
//!
//! The reminder engine is pure and lives in [`engine`]; everything else wires
//! it to a clock, a state file, desktop notifications and a small HTTP API.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
