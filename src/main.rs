//! Health Reminder - A local daemon that tracks the workday and fires wellness reminders
//!
//! This is the main entry point for the health-reminder application.

use std::{sync::Arc, time::Duration};
use anyhow::Context;
use chrono::Local;
use tokio::net::TcpListener;
use tracing::info;

use health_reminder::{
    api::create_router,
    config::Config,
    services::{DesktopNotifier, LogNotifier, Notifier, VideoBridge},
    state::{AppState, JsonFileStore},
    tasks::{event_dispatch_task, focus_guard_task, reconcile_loop::Cadence, reconcile_task},
    utils::shutdown_signal,
};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("health_reminder={},tower_http=info", config.log_level()))
        .init();

    info!("Starting health-reminder server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}, tick={}s",
        config.host,
        config.port,
        config.data_dir.display(),
        config.tick_seconds
    );

    let store = JsonFileStore::new(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?;
    info!("State file: {}", store.path().display());

    let notifier: Arc<dyn Notifier> = if config.no_desktop {
        Arc::new(LogNotifier)
    } else {
        Arc::new(DesktopNotifier::new(config.chime_command.clone()))
    };

    // Create application state
    let state = Arc::new(AppState::load_or_init(
        config.port,
        config.host.clone(),
        Arc::new(store),
        notifier,
        Arc::new(VideoBridge::new()),
        Local::now(),
    ));

    // Presentation must be listening before the first tick publishes anything
    let dispatch_state = Arc::clone(&state);
    tokio::spawn(async move {
        event_dispatch_task(dispatch_state, NOTIFY_TIMEOUT).await;
    });

    let reconcile_state = Arc::clone(&state);
    let cadence = Cadence {
        tick: config.tick(),
        override_tick: config.override_tick(),
    };
    tokio::spawn(async move {
        reconcile_task(reconcile_state, cadence).await;
    });

    let guard_state = Arc::clone(&state);
    let guard_interval = config.guard_interval();
    tokio::spawn(async move {
        focus_guard_task(guard_state, guard_interval).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status               - Reconcile and report status, timers and settings");
    info!("  POST /timers/reset         - Reset all countdowns");
    info!("  POST /timers/:kind/reset   - Reset one countdown");
    info!("  POST /exercise/:kind       - Show an exercise routine now");
    info!("  POST /pause/toggle         - Pause or resume reminders");
    info!("  PUT  /config               - Update settings");
    info!("  POST /focus/start|stop     - Focus mode");
    info!("  POST /pomodoro/start|stop  - Pomodoro mode");
    info!("  POST /notify/test          - Show a sample reminder");
    info!("  GET  /video/command        - Browser bridge: next video command");
    info!("  POST /video/report         - Browser bridge: playback state");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
