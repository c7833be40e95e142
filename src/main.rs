//! DealVerse Notifier, the headless notification pipeline daemon.
//!
//! Loads configuration, connects the WebSocket push source, runs the
//! notification engine, and logs surfaced UI events until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tracing_subscriber::{EnvFilter, fmt};

use dealverse_client::HttpBackend;
use dealverse_core::config::AppConfig;
use dealverse_core::error::AppError;
use dealverse_notify::source::{EventSource, WsNotificationSource};
use dealverse_notify::{NotificationEngine, UiEvent};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Notifier error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DEALVERSE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main notifier run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DealVerse notifier v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Backend client and engine ────────────────────────
    let backend = HttpBackend::from_config(&config.backend)?;
    tracing::info!(base_url = %config.backend.base_url, "Backend client ready");

    let engine = NotificationEngine::new(config.clone(), Arc::new(backend))?;

    // ── Step 2: Startup sync (fails soft) ────────────────────────
    engine.sync().await;

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: WebSocket push source ────────────────────────────
    let (events_tx, events_rx) = mpsc::channel(config.source.event_buffer.max(1));
    let source = WsNotificationSource::new(config.source.clone());
    tracing::info!(
        url = %config.source.url,
        source_type = source.source_type(),
        "Connecting push source"
    );
    let source_shutdown = shutdown_rx.clone();
    let source_handle = tokio::spawn(async move {
        if let Err(e) = source.run(events_tx, source_shutdown).await {
            tracing::error!("Push source stopped: {}", e);
        }
    });

    // ── Step 5: UI event logger ──────────────────────────────────
    let mut ui_events = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match ui_events.recv().await {
                Ok(event) => log_ui_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "UI event logger lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // ── Step 6: Signal handler ───────────────────────────────────
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping notifier...");
        let _ = shutdown_tx.send(true);
    });

    // ── Step 7: Run the engine until shutdown ────────────────────
    engine.run(events_rx, shutdown_rx).await?;

    // ── Step 8: Wait for the source to disconnect ────────────────
    let _ = tokio::time::timeout(Duration::from_secs(5), source_handle).await;

    tracing::info!("DealVerse notifier shut down gracefully");
    Ok(())
}

/// Log one surfaced UI event.
fn log_ui_event(event: &UiEvent) {
    match event {
        UiEvent::NotificationAdded { notification } => {
            tracing::info!(
                id = %notification.id,
                category = %notification.category,
                priority = %notification.priority,
                "Notification: {}",
                notification.title
            );
        }
        UiEvent::NotificationUpdated { notification } => {
            tracing::debug!(id = %notification.id, "Notification updated");
        }
        UiEvent::UnreadCount { unread, total } => {
            tracing::debug!(unread, total, "Counts changed");
        }
        UiEvent::ToastPushed { toast } => {
            tracing::info!(id = %toast.notification.id, "Toast: {}", toast.notification.title);
        }
        UiEvent::ToastProgress { .. } => {}
        UiEvent::ToastRemoved { id, reason } => {
            tracing::debug!(id = %id, ?reason, "Toast removed");
        }
        UiEvent::ActivityAdded { entry } => {
            tracing::info!(
                activity_type = %entry.activity_type,
                "Activity: {} / {}",
                entry.actor,
                entry.subject
            );
        }
        UiEvent::Connection { status } => {
            tracing::info!(?status, "Push channel status");
        }
        UiEvent::BackendError { context, message } => {
            tracing::warn!(context, "Backend error: {}", message);
        }
        UiEvent::DigestReady { summary } => {
            tracing::info!(count = summary.count, "Quiet-hours digest ready");
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
