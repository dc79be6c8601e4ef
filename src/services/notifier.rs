//! Reminder presentation: desktop notifications and the audio cue

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Presentation collaborator. Calls are fire-and-forget from the engine's
/// point of view; an error here never undoes a fired reminder.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, kind: &str, title: &str, message: &str) -> Result<(), String>;

    async fn play_chime(&self) -> Result<(), String>;
}

/// Shows notifications through `notify-send` and plays an optional chime command
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier {
    chime_command: Option<String>,
}

impl DesktopNotifier {
    pub fn new(chime_command: Option<String>) -> Self {
        Self { chime_command }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, kind: &str, title: &str, message: &str) -> Result<(), String> {
        debug!("Sending desktop notification for {}", kind);

        let output = Command::new("notify-send")
            .args(["--app-name=health-reminder", "--urgency=normal", title, message])
            .output()
            .await
            .map_err(|e| format!("Failed to execute notify-send: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("notify-send failed: {}", stderr));
        }
        Ok(())
    }

    async fn play_chime(&self) -> Result<(), String> {
        let Some(command) = &self.chime_command else {
            return Ok(());
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(());
        };

        let output = Command::new(program)
            .args(parts)
            .output()
            .await
            .map_err(|e| format!("Failed to execute chime command: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("chime command failed: {}", stderr));
        }
        Ok(())
    }
}

/// Writes reminders to the log only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, kind: &str, title: &str, message: &str) -> Result<(), String> {
        info!("[{}] {}: {}", kind, title, message);
        Ok(())
    }

    async fn play_chime(&self) -> Result<(), String> {
        debug!("Chime");
        Ok(())
    }
}
