//! Video remote-control bridge
//!
//! The browser content script that owns the actual player talks to us over
//! loopback: it reports playback state and polls for the next command. We
//! never address the player directly.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Video collaborator used by Focus mode
pub trait VideoControl: Send + Sync {
    /// Pause every playing instance
    fn pause(&self) -> Result<(), String>;

    fn is_playing(&self) -> bool;

    /// Revert any playback while `blocked` holds
    fn enforce(&self, blocked: bool) {
        if blocked && self.is_playing() {
            if let Err(e) = self.pause() {
                warn!("Failed to enforce video pause: {}", e);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCommand {
    None,
    Pause,
}

#[derive(Debug, Clone, Default)]
struct BridgeState {
    playing: bool,
    pending_pause: bool,
    blocked: bool,
    last_report: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct VideoBridge {
    inner: Mutex<BridgeState>,
}

impl VideoBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the playback state reported by the content script
    pub fn report(&self, playing: bool) -> Result<(), String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock video bridge: {}", e))?;
        inner.playing = playing;
        inner.last_report = Some(Utc::now());
        if playing && inner.blocked {
            inner.pending_pause = true;
        }
        Ok(())
    }

    /// Hand the next command to the content script, clearing it
    pub fn take_command(&self) -> Result<(VideoCommand, bool), String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock video bridge: {}", e))?;
        let command = if std::mem::take(&mut inner.pending_pause) {
            VideoCommand::Pause
        } else {
            VideoCommand::None
        };
        Ok((command, inner.blocked))
    }

    pub fn last_report(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().ok().and_then(|inner| inner.last_report)
    }
}

impl VideoControl for VideoBridge {
    fn pause(&self) -> Result<(), String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| format!("Failed to lock video bridge: {}", e))?;
        inner.pending_pause = true;
        debug!("Video pause queued");
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().map(|inner| inner.playing).unwrap_or(false)
    }

    fn enforce(&self, blocked: bool) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(e) => {
                warn!("Failed to lock video bridge: {}", e);
                return;
            }
        };
        inner.blocked = blocked;
        if !blocked {
            inner.pending_pause = false;
        } else if inner.playing && !inner.pending_pause {
            debug!("Playback during focus, queueing pause");
            inner.pending_pause = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_is_delivered_once() {
        let bridge = VideoBridge::new();
        bridge.pause().unwrap();

        assert_eq!(bridge.take_command().unwrap(), (VideoCommand::Pause, false));
        assert_eq!(bridge.take_command().unwrap(), (VideoCommand::None, false));
    }

    #[test]
    fn playback_while_blocked_is_reverted() {
        let bridge = VideoBridge::new();
        bridge.enforce(true);
        bridge.report(true).unwrap();

        assert_eq!(bridge.take_command().unwrap(), (VideoCommand::Pause, true));

        bridge.enforce(false);
        bridge.report(true).unwrap();
        assert_eq!(bridge.take_command().unwrap(), (VideoCommand::None, false));
    }

    #[test]
    fn unblocking_drops_an_undelivered_pause() {
        let bridge = VideoBridge::new();
        bridge.enforce(true);
        bridge.pause().unwrap();

        bridge.enforce(false);
        bridge.report(true).unwrap();
        assert_eq!(bridge.take_command().unwrap(), (VideoCommand::None, false));
        assert!(bridge.last_report().is_some());
    }

    #[test]
    fn enforce_queues_pause_for_known_playback() {
        let bridge = VideoBridge::new();
        bridge.report(true).unwrap();
        assert_eq!(bridge.take_command().unwrap().0, VideoCommand::None);

        bridge.enforce(true);
        assert_eq!(bridge.take_command().unwrap().0, VideoCommand::Pause);
    }
}
