//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use dealverse_client::InMemoryBackend;
use dealverse_core::config::AppConfig;
use dealverse_entity::notification::{
    LiveNotification, NotificationCategory, NotificationKind, NotificationPriority,
};
use dealverse_notify::source::SourceEvent;
use dealverse_notify::{NotificationEngine, UiEvent};

/// A running notification engine with direct source-event injection.
pub struct TestPipeline {
    /// The engine under test
    pub engine: Arc<NotificationEngine>,
    /// Backend double for seeding state and forcing failures
    pub backend: Arc<InMemoryBackend>,
    /// UI event subscription, opened before the engine starts
    pub ui: broadcast::Receiver<UiEvent>,
    events: mpsc::Sender<SourceEvent>,
    shutdown: watch::Sender<bool>,
    runner: Option<JoinHandle<()>>,
}

impl TestPipeline {
    /// Start a pipeline with the given configuration and an empty backend.
    pub async fn start(config: AppConfig) -> Self {
        Self::start_with_backend(config, Arc::new(InMemoryBackend::new())).await
    }

    /// Start a pipeline against a pre-seeded backend.
    pub async fn start_with_backend(config: AppConfig, backend: Arc<InMemoryBackend>) -> Self {
        let engine = Arc::new(
            NotificationEngine::new(config, backend.clone()).expect("engine config is valid"),
        );
        engine.sync().await;

        let ui = engine.subscribe();
        let (events_tx, events_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let runner_engine = engine.clone();
        let runner = tokio::spawn(async move {
            let _ = runner_engine.run(events_rx, shutdown_rx).await;
        });
        // Let the run loop reach its select before the first injection.
        tokio::task::yield_now().await;

        Self {
            engine,
            backend,
            ui,
            events: events_tx,
            shutdown: shutdown_tx,
            runner: Some(runner),
        }
    }

    /// Inject one pushed notification and let the engine process it.
    pub async fn push(&self, notification: LiveNotification) {
        self.send(SourceEvent::Notification(notification)).await;
    }

    /// Inject a raw source event and let the engine process it.
    pub async fn send(&self, event: SourceEvent) {
        self.events.send(event).await.expect("engine is running");
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    /// Collect every UI event emitted so far.
    pub fn drain_ui(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.ui.try_recv() {
            events.push(event);
        }
        events
    }

    /// Stop the engine and wait for the run loop to exit.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(runner) = self.runner.take() {
            let _ = runner.await;
        }
    }
}

/// Default configuration with the toast knobs commonly varied by tests.
pub fn toast_config(max_toasts: usize, duration_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.toast.max_toasts = max_toasts;
    config.toast.duration_ms = duration_ms;
    config.toast.tick_ms = 100;
    config
}

/// A notification with the given category and priority.
pub fn notification(
    category: NotificationCategory,
    priority: NotificationPriority,
) -> LiveNotification {
    LiveNotification::new(
        NotificationKind::Info,
        category,
        priority,
        "Deal room update",
        "Project Meridian has new diligence materials",
    )
}

/// Advance paused time in scheduler-tick (100 ms) steps.
///
/// Stepping one tick at a time keeps interval timers firing once per
/// tick instead of collapsing a large jump into a single missed-tick
/// catch-up.
pub async fn run_ticks(n: u32) {
    tokio::task::yield_now().await;
    for _ in 0..n {
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
    }
}
