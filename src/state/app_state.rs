//! Main application state management
//!
//! Every entry point, the reconcile loop as well as the HTTP handlers, runs
//! the same critical section: load the committed engine state, tick it to
//! now, apply the action if any, persist, commit. Events are published only
//! after the save succeeded so a reminder is never shown twice after a
//! restart.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Local, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::engine::{
    Action, DayClassification, EngineState, OverrideSession, ReminderEvent, Settings, StatusView,
};
use crate::error::AppError;
use crate::services::{Notifier, VideoBridge, VideoControl};
use super::store::StateStore;

const STORAGE: &str = "storage";

/// Result of one pass through the critical section
#[derive(Debug, Clone)]
pub struct TickReport {
    pub state: EngineState,
    pub status: StatusView,
    pub events: Vec<ReminderEvent>,
    pub day: DayClassification,
    /// False when the save failed and the result was not committed
    pub persisted: bool,
}

fn focus_blocks(state: &EngineState, now: DateTime<Utc>) -> bool {
    match state.overrides.session {
        OverrideSession::Focus { ends_at } => now < ends_at,
        _ => false,
    }
}

/// Main application state shared by the background tasks and the handlers
pub struct AppState {
    /// Last committed engine state
    engine: Mutex<EngineState>,
    store: Arc<dyn StateStore>,
    /// Presentation collaborator used by the event dispatch task
    pub notifier: Arc<dyn Notifier>,
    /// Loopback bridge to the browser video player
    pub video: Arc<VideoBridge>,
    /// Human-readable failures shown in /status
    errors: Mutex<Vec<String>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Fired reminders, consumed by the event dispatch task
    pub event_tx: broadcast::Sender<ReminderEvent>,
    /// Latest derived status
    pub status_tx: watch::Sender<StatusView>,
    /// Keep the receiver alive to prevent channel closure
    pub _status_rx: watch::Receiver<StatusView>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
        video: Arc<VideoBridge>,
        initial: EngineState,
        now: DateTime<Local>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (status_tx, status_rx) = watch::channel(initial.status(&now));

        Self {
            engine: Mutex::new(initial),
            store,
            notifier,
            video,
            errors: Mutex::new(Vec::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            status_tx,
            _status_rx: status_rx,
        }
    }

    /// Build the state from whatever the store holds, falling back to a
    /// first-run state with default settings.
    pub fn load_or_init(
        port: u16,
        host: String,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
        video: Arc<VideoBridge>,
        now: DateTime<Local>,
    ) -> Self {
        let (initial, load_error) = match store.load() {
            Ok(Some(state)) => {
                info!("Restored engine state, last observed at {}", state.timers.last_observed_at);
                (state, None)
            }
            Ok(None) => {
                info!("No saved state, starting fresh");
                (EngineState::new(Settings::default(), now), None)
            }
            Err(e) => {
                warn!("Failed to load saved state, starting fresh: {}", e);
                (
                    EngineState::new(Settings::default(), now),
                    Some(format!("Storage load failed: {}", e)),
                )
            }
        };

        let state = Self::new(port, host, store, notifier, video, initial, now);
        if let Some(error) = load_error {
            if let Err(e) = state.add_error(error) {
                warn!("{}", e);
            }
        }
        state
    }

    /// Tick the engine to `now` without any user action
    pub fn reconcile(&self, now: DateTime<Local>) -> Result<TickReport, AppError> {
        self.run(None, now)
    }

    /// Tick the engine to `now`, then apply `action`
    pub fn perform(&self, action: Action, now: DateTime<Local>) -> Result<TickReport, AppError> {
        info!("Performing action: {}", action.name());
        let report = self.run(Some(&action), now)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.name().to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Action::StartFocus { .. } = action {
            if let Err(e) = self.video.pause() {
                warn!("Failed to pause video for focus: {}", e);
            }
        }

        Ok(report)
    }

    fn run(&self, action: Option<&Action>, now: DateTime<Local>) -> Result<TickReport, AppError> {
        let mut committed = self
            .engine
            .lock()
            .map_err(|e| AppError::Lock(format!("engine state: {}", e)))?;

        let outcome = committed.tick(now);
        if outcome.elapsed_seconds > 0 {
            debug!("Reconciled {}s of elapsed time", outcome.elapsed_seconds);
        }
        let mut next = outcome.state;
        let mut events = outcome.events;

        if let Some(action) = action {
            events.extend(next.apply(action, now)?);
        }
        let status = next.status(&now);

        if let Err(e) = self.store.save(&next) {
            drop(committed);
            warn!("Failed to persist engine state: {}", e);
            if let Err(e) = self.add_error(format!("Storage save failed: {}", e)) {
                warn!("{}", e);
            }
            if action.is_some() {
                return Err(e.into());
            }
            // nothing fired and nothing committed; the next tick retries the same span
            return Ok(TickReport {
                state: next,
                status,
                events: Vec::new(),
                day: outcome.day,
                persisted: false,
            });
        }

        *committed = next.clone();
        drop(committed); // Release the lock before notifying anyone

        // Focus start, stop and natural expiry reach the player right away
        self.video.enforce(focus_blocks(&next, now.with_timezone(&Utc)));

        if let Err(e) = self.clear_errors_for(STORAGE) {
            warn!("{}", e);
        }
        for event in &events {
            info!("Reminder fired: {:?}", event);
            if let Err(e) = self.event_tx.send(event.clone()) {
                debug!("No listener for reminder event: {}", e);
            }
        }
        if let Err(e) = self.status_tx.send(status.clone()) {
            warn!("Failed to send status update: {}", e);
        }

        Ok(TickReport {
            state: next,
            status,
            events,
            day: outcome.day,
            persisted: true,
        })
    }

    /// Current settings from the committed state
    pub fn settings(&self) -> Result<Settings, AppError> {
        self.engine
            .lock()
            .map(|state| state.settings.clone())
            .map_err(|e| AppError::Lock(format!("engine state: {}", e)))
    }

    /// Copy of the last committed engine state
    pub fn snapshot(&self) -> Result<EngineState, AppError> {
        self.engine
            .lock()
            .map(|state| state.clone())
            .map_err(|e| AppError::Lock(format!("engine state: {}", e)))
    }

    /// Whether the committed state holds an unexpired Focus session
    pub fn is_video_blocked(&self, now: DateTime<Utc>) -> bool {
        self.engine
            .lock()
            .map(|state| focus_blocks(&state, now))
            .unwrap_or(false)
    }

    /// Whether any override session is running, used to pick the loop cadence
    pub fn has_active_override(&self) -> bool {
        self.engine
            .lock()
            .map(|state| state.overrides.session.is_active())
            .unwrap_or(false)
    }

    /// Add an error to the state
    pub fn add_error(&self, error: String) -> Result<(), String> {
        let mut errors = self
            .errors
            .lock()
            .map_err(|e| format!("Failed to lock error list: {}", e))?;

        if !errors.contains(&error) {
            warn!("Adding error to state: {}", error);
            errors.push(error);
        }
        Ok(())
    }

    /// Clear errors for a specific component
    pub fn clear_errors_for(&self, component: &str) -> Result<(), String> {
        let mut errors = self
            .errors
            .lock()
            .map_err(|e| format!("Failed to lock error list: {}", e))?;

        let initial_count = errors.len();
        let needle = component.to_lowercase();
        errors.retain(|error| !error.to_lowercase().contains(&needle));
        if errors.len() != initial_count {
            info!("Cleared {} error(s) for {}", initial_count - errors.len(), component);
        }
        Ok(())
    }

    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ReminderKind, WorkStatus};
    use crate::services::{LogNotifier, VideoCommand};
    use crate::state::store::MemoryStore;
    use chrono::TimeZone;

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, day, hour, minute, 0)
            .earliest()
            .expect("valid local time")
    }

    fn app(store: Arc<MemoryStore>, now: DateTime<Local>) -> AppState {
        AppState::load_or_init(
            3000,
            "127.0.0.1".into(),
            store,
            Arc::new(LogNotifier),
            Arc::new(VideoBridge::new()),
            now,
        )
    }

    #[test]
    fn reconcile_persists_and_publishes() {
        let store = Arc::new(MemoryStore::new());
        let state = app(store.clone(), local(6, 9, 0));
        let mut rx = state.event_tx.subscribe();

        let report = state.reconcile(local(6, 9, 30)).unwrap();
        assert!(report.persisted);
        assert!(report
            .events
            .contains(&ReminderEvent::Periodic { kind: ReminderKind::Walk }));
        assert_eq!(store.snapshot(), Some(report.state.clone()));

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        assert_eq!(received, report.events);
    }

    #[test]
    fn failed_save_commits_nothing() {
        let store = Arc::new(MemoryStore::new());
        let state = app(store.clone(), local(6, 9, 0));
        let mut rx = state.event_tx.subscribe();

        store.set_failing(true);
        let report = state.reconcile(local(6, 9, 30)).unwrap();
        assert!(!report.persisted);
        assert!(report.events.is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(state.get_errors().len(), 1);

        let err = state.perform(Action::TogglePause, local(6, 9, 31)).unwrap_err();
        assert!(!err.is_rejection());

        // once storage is back the walk fires exactly once and the error clears
        store.set_failing(false);
        let report = state.reconcile(local(6, 9, 32)).unwrap();
        assert!(report.persisted);
        assert!(report
            .events
            .contains(&ReminderEvent::Periodic { kind: ReminderKind::Walk }));
        assert!(state.get_errors().is_empty());
    }

    #[test]
    fn focus_start_pauses_video_and_blocks() {
        let store = Arc::new(MemoryStore::new());
        let now = local(6, 9, 0);
        let state = app(store, now);

        let report = state.perform(Action::StartFocus { minutes: 30 }, now).unwrap();
        assert_eq!(report.status.status, WorkStatus::Focus);
        assert_eq!(state.video.take_command().unwrap().0, VideoCommand::Pause);
        assert!(state.is_video_blocked(now.with_timezone(&Utc)));
        assert!(!state.is_video_blocked(local(6, 9, 31).with_timezone(&Utc)));
        assert_eq!(state.get_last_action().0.as_deref(), Some("focus-start"));
    }

    #[test]
    fn replay_during_focus_is_reverted_immediately() {
        let store = Arc::new(MemoryStore::new());
        let now = local(6, 9, 0);
        let state = app(store, now);

        state.perform(Action::StartFocus { minutes: 25 }, now).unwrap();
        assert_eq!(state.video.take_command().unwrap(), (VideoCommand::Pause, true));

        state.video.report(true).unwrap();
        assert_eq!(state.video.take_command().unwrap(), (VideoCommand::Pause, true));
    }

    #[test]
    fn stopping_focus_unblocks_immediately() {
        let store = Arc::new(MemoryStore::new());
        let now = local(6, 9, 0);
        let state = app(store, now);

        state.perform(Action::StartFocus { minutes: 25 }, now).unwrap();
        state.perform(Action::StopFocus, local(6, 9, 1)).unwrap();
        state.video.report(true).unwrap();
        assert_eq!(state.video.take_command().unwrap(), (VideoCommand::None, false));
    }

    #[test]
    fn focus_expiry_unblocks_on_the_next_tick() {
        let store = Arc::new(MemoryStore::new());
        let now = local(6, 9, 0);
        let state = app(store, now);

        state.perform(Action::StartFocus { minutes: 10 }, now).unwrap();
        state.reconcile(local(6, 9, 11)).unwrap();
        state.video.report(true).unwrap();
        assert_eq!(state.video.take_command().unwrap(), (VideoCommand::None, false));
    }

    #[test]
    fn concurrent_surfaces_neither_lose_updates_nor_double_fire() {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(app(store.clone(), local(6, 9, 0)));
        let mut rx = state.event_tx.subscribe();
        let due = local(6, 9, 30);

        std::thread::scope(|scope| {
            for i in 0..8 {
                let state = Arc::clone(&state);
                scope.spawn(move || match i % 4 {
                    0 => {
                        state.reconcile(due).unwrap();
                    }
                    1 => {
                        state.perform(Action::TogglePause, due).unwrap();
                    }
                    2 => {
                        state.perform(Action::ResetTimer(ReminderKind::Water), due).unwrap();
                    }
                    _ => {
                        let patch = crate::engine::SettingsPatch {
                            sound_enabled: Some(false),
                            ..Default::default()
                        };
                        state.perform(Action::UpdateSettings(patch), due).unwrap();
                    }
                });
            }
        });

        let mut walks = 0;
        while let Ok(event) = rx.try_recv() {
            if event == (ReminderEvent::Periodic { kind: ReminderKind::Walk }) {
                walks += 1;
            }
        }
        assert_eq!(walks, 1);

        let committed = state.snapshot().unwrap();
        // two toggles cancel out, the settings patch survives
        assert!(!committed.paused);
        assert!(!committed.settings.sound_enabled);
        assert_eq!(store.snapshot(), Some(committed));
    }

    #[test]
    fn restores_saved_state() {
        let store = Arc::new(MemoryStore::new());
        let first = app(store.clone(), local(6, 9, 0));
        first.perform(Action::TogglePause, local(6, 9, 5)).unwrap();

        let second = app(store, local(6, 9, 10));
        let report = second.reconcile(local(6, 9, 10)).unwrap();
        assert!(report.state.paused);
        assert_eq!(report.status.status, WorkStatus::Paused);
    }
}
