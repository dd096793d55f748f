//! # Padmouse
//!
//! Drive the desktop pointer and keyboard with a game controller.
//!
//! Polls the controller at a fixed rate and replays sticks and buttons as
//! mouse movement, scrolling, clicks and keys according to the user settings.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use padmouse::config::{Config, LoggingConfig};
use padmouse::controller::open_platform_poller;
use padmouse::engine::status::{Status, StatusSink, TracingStatusSink};
use padmouse::engine::{TickTime, TranslationEngine};
use padmouse::input::open_platform_injector;
use padmouse::settings::{Settings, SettingsHandle, SettingsStore};

/// Config file read when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Debug log file written under `[logging] dir`
const LOG_FILE_NAME: &str = "padmouse.log";

/// Settings updates that may queue up between two ticks
const SETTINGS_QUEUE_CAPACITY: usize = 16;

/// Main entry point for Padmouse
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load the config file (first argument, or `config/default.toml`)
///    - Set up console and file logging
///    - Bind the platform poller and injector, falling back to no-op providers
///    - Load the user settings
///
/// 2. **Main Loop**
///    - Run one engine tick per poll interval, skipping missed ticks
///    - Apply queued settings updates between ticks
///    - Reload settings on SIGHUP
///    - Handle Ctrl+C for shutdown
///
/// Keys held by a mapped control when the loop stops are not released.
///
/// # Errors
///
/// Returns error if:
/// - The config file exists but cannot be read or is invalid
/// - The log directory cannot be created
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config_found = config_path.exists();
    let config = if config_found {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    let _log_guard = init_logging(&config.logging)?;

    info!("Padmouse v{} starting...", env!("CARGO_PKG_VERSION"));
    if config_found {
        info!("Loaded config from {}", config_path.display());
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
    }

    let poller = open_platform_poller();
    let injector = open_platform_injector();
    info!(
        "Controller backend: {} ({})",
        poller.backend(),
        availability(poller.is_available())
    );
    info!(
        "Input backend: {} ({})",
        injector.backend(),
        availability(injector.is_available())
    );

    let mut store = SettingsStore::open(&config.settings.path);
    let mut settings = store.get();
    log_settings(&settings);

    let (status_tx, status_rx) = watch::channel(Status::default());
    tokio::spawn(log_status(status_rx));

    let mut engine = TranslationEngine::new(
        poller,
        injector,
        Box::new(status_tx),
        config.engine.status_interval_ms,
    );

    // Kept alive for the whole run so the update queue never closes
    let (settings_handle, mut updates) = SettingsHandle::channel(SETTINGS_QUEUE_CAPACITY);
    #[cfg(unix)]
    spawn_reload_on_hangup(settings_handle.clone())?;

    let mut ticker = interval(Duration::from_millis(config.engine.poll_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        "Polling every {}ms, press Ctrl+C to exit",
        config.engine.poll_interval_ms
    );

    loop {
        tokio::select! {
            at = ticker.tick() => {
                engine.tick(&settings, TickTime { monotonic: at.into_std(), wall: Utc::now() });
            }

            Some(update) = updates.recv() => {
                settings = store.apply(update);
                log_settings(&settings);
            }

            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    drop(settings_handle);
    Ok(())
}

/// Console logging, plus the debug log file when enabled.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let console = fmt::layer();

    if !logging.file {
        tracing_subscriber::registry().with(filter).with(console).init();
        return Ok(None);
    }

    std::fs::create_dir_all(&logging.dir)
        .with_context(|| format!("Failed to create log dir {}", logging.dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&logging.dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(Some(guard))
}

fn log_settings(settings: &Settings) {
    info!(
        "Settings: sensitivity {}x{}, scroll {}, deadzone {}, {} controls mapped, {}",
        settings.sensitivity_x,
        settings.sensitivity_y,
        settings.scroll_speed,
        settings.deadzone,
        settings.mappings.bound_count(),
        if settings.enabled { "enabled" } else { "disabled" }
    );
    for (control, action) in settings.mappings.iter().filter(|(_, action)| !action.is_none()) {
        debug!("  {} -> {}", control, action.label());
    }
}

/// Mirrors every published status into the log.
async fn log_status(mut status_rx: watch::Receiver<Status>) {
    let mut sink = TracingStatusSink;
    while status_rx.changed().await.is_ok() {
        let status = *status_rx.borrow_and_update();
        sink.publish(status);
    }
}

#[cfg(unix)]
fn spawn_reload_on_hangup(handle: SettingsHandle) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("Failed to listen for SIGHUP")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("Received SIGHUP");
            if handle.reload().await.is_err() {
                break;
            }
        }
    });
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable, running without it"
    }
}
