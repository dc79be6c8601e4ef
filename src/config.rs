//! Configuration and CLI argument handling
//!
//! Only process-level knobs live here. Reminder settings are persisted with
//! the engine state and changed through PUT /config.

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "health-reminder")]
#[command(about = "A local daemon that tracks the workday and fires wellness reminders")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding state.json
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Seconds between reconcile ticks
    #[arg(long, default_value = "60")]
    pub tick_seconds: u64,

    /// Seconds between reconcile ticks while Focus or Pomodoro is running
    #[arg(long, default_value = "10")]
    pub override_tick_seconds: u64,

    /// Seconds between video checks during Focus
    #[arg(long, default_value = "5")]
    pub guard_seconds: u64,

    /// Log reminders instead of showing desktop notifications
    #[arg(long)]
    pub no_desktop: bool,

    /// Command run for the audio cue, e.g. "paplay /usr/share/sounds/chime.oga"
    #[arg(long)]
    pub chime_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_seconds.max(1))
    }

    pub fn override_tick(&self) -> Duration {
        Duration::from_secs(self.override_tick_seconds.max(1))
    }

    pub fn guard_interval(&self) -> Duration {
        Duration::from_secs(self.guard_seconds.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["health-reminder"]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick(), Duration::from_secs(60));
        assert_eq!(config.override_tick(), Duration::from_secs(10));
        assert_eq!(config.log_level(), "info");
        assert!(config.chime_command.is_none());
    }

    #[test]
    fn zero_cadence_is_raised_to_one_second() {
        let config = Config::parse_from(["health-reminder", "--tick-seconds", "0", "-v"]);
        assert_eq!(config.tick(), Duration::from_secs(1));
        assert_eq!(config.log_level(), "debug");
    }
}
