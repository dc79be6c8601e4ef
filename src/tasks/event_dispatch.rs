//! Reminder presentation task

use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::error::RecvError, time::timeout};
use tracing::{debug, error, info, warn};

use crate::{
    engine::ReminderEvent,
    services::{present, present_routine, Notifier, Routine},
    state::AppState,
};

const NOTIFICATION: &str = "notification";

/// Background task that shows every committed reminder.
///
/// Presentation happens off the critical section and each call is bounded by
/// `limit`, so a hung notification daemon cannot stall reconciliation.
pub async fn event_dispatch_task(state: Arc<AppState>, limit: Duration) {
    info!("Starting event dispatch task");

    let mut event_rx = state.event_tx.subscribe();

    loop {
        match event_rx.recv().await {
            Ok(event) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    dispatch(&state, &event, limit).await;
                });
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event dispatch lagged, {} reminder(s) dropped", skipped);
            }
            Err(RecvError::Closed) => {
                error!("Reminder event channel closed, stopping dispatch");
                break;
            }
        }
    }
}

async fn dispatch(state: &AppState, event: &ReminderEvent, limit: Duration) {
    let settings = match state.settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Skipping reminder, settings unavailable: {}", e);
            return;
        }
    };

    let presentation = present(event);
    debug!("Presenting {} reminder", presentation.kind);

    if settings.notification_enabled {
        let result = bounded(
            limit,
            state
                .notifier
                .notify(&presentation.kind, &presentation.title, &presentation.message),
        )
        .await;
        record(state, result);
    }

    if settings.sound_enabled {
        if let Err(e) = bounded(limit, state.notifier.play_chime()).await {
            warn!("Failed to play chime: {}", e);
        }
    }
}

/// Present a sample reminder regardless of the enabled flags
pub async fn send_test_notification(notifier: Arc<dyn Notifier>, limit: Duration) -> Result<(), String> {
    let presentation = present(&ReminderEvent::Periodic {
        kind: crate::engine::ReminderKind::Walk,
    });
    bounded(
        limit,
        notifier.notify("test", &presentation.title, &presentation.message),
    )
    .await?;
    bounded(limit, notifier.play_chime()).await
}

/// Show an exercise routine the user asked for
pub async fn send_routine(
    notifier: Arc<dyn Notifier>,
    routine: &Routine,
    limit: Duration,
) -> Result<(), String> {
    let presentation = present_routine(routine);
    bounded(
        limit,
        notifier.notify(&presentation.kind, &presentation.title, &presentation.message),
    )
    .await
}

async fn bounded<F>(limit: Duration, call: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    timeout(limit, call)
        .await
        .map_err(|_| format!("timed out after {}s", limit.as_secs()))?
}

fn record(state: &AppState, result: Result<(), String>) {
    let outcome = match result {
        Ok(()) => state.clear_errors_for(NOTIFICATION),
        Err(e) => {
            warn!("Failed to show notification: {}", e);
            state.add_error(format!("Notification failed: {}", e))
        }
    };
    if let Err(e) = outcome {
        warn!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<String>>,
        chimes: Mutex<u32>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, kind: &str, _title: &str, _message: &str) -> Result<(), String> {
            self.shown.lock().unwrap().push(kind.to_string());
            Ok(())
        }

        async fn play_chime(&self) -> Result<(), String> {
            *self.chimes.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct HangingNotifier;

    #[async_trait]
    impl Notifier for HangingNotifier {
        async fn notify(&self, _kind: &str, _title: &str, _message: &str) -> Result<(), String> {
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn play_chime(&self) -> Result<(), String> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_notification_reaches_notifier() {
        let notifier = Arc::new(RecordingNotifier::default());
        send_test_notification(notifier.clone(), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(*notifier.shown.lock().unwrap(), vec!["test".to_string()]);
        assert_eq!(*notifier.chimes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn routine_is_shown_under_its_kind() {
        let notifier = Arc::new(RecordingNotifier::default());
        let routine = crate::services::routine_for(crate::engine::ReminderKind::Posture).unwrap();
        send_routine(notifier.clone(), &routine, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(*notifier.shown.lock().unwrap(), vec!["posture".to_string()]);
        assert_eq!(*notifier.chimes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn hung_notifier_is_cut_off() {
        let err = send_test_notification(Arc::new(HangingNotifier), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.contains("timed out"));
    }
}
