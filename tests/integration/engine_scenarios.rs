//! End-to-end pipeline scenarios: source events in, store/toast/UI state out.

mod helpers;

use std::sync::Arc;

use chrono::Utc;

use dealverse_client::InMemoryBackend;
use dealverse_entity::activity::{ActivityEntry, ActivityType};
use dealverse_entity::notification::{
    NotificationCategory, NotificationPreferences, NotificationPriority,
};
use dealverse_notify::source::{ConnectionStatus, SourceEvent};
use dealverse_notify::{ToastCloseReason, UiEvent};

use helpers::TestPipeline;

#[tokio::test(start_paused = true)]
async fn test_pushed_notification_lands_in_store_and_overlay() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    let incoming = helpers::notification(NotificationCategory::Document, NotificationPriority::Medium);
    let id = incoming.id;

    pipeline.push(incoming).await;

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.unread, 1);
    assert_eq!(snapshot.toasts.len(), 1);
    assert_eq!(snapshot.toasts[0].notification.id, id);

    let events = pipeline.drain_ui();
    assert!(events
        .iter()
        .any(|e| matches!(e, UiEvent::NotificationAdded { notification } if notification.id == id)));
    assert!(events
        .iter()
        .any(|e| matches!(e, UiEvent::ToastPushed { toast } if toast.notification.id == id)));
    assert!(events
        .iter()
        .any(|e| matches!(e, UiEvent::UnreadCount { unread: 1, total: 1 })));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_synced_backlog_never_toasts() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed_notifications(vec![
        helpers::notification(NotificationCategory::Document, NotificationPriority::High),
        helpers::notification(NotificationCategory::System, NotificationPriority::Low),
    ]);

    let mut pipeline =
        TestPipeline::start_with_backend(helpers::toast_config(5, 5000), backend).await;

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.unread, 2);
    assert!(snapshot.toasts.is_empty());

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_minimum_priority_applies_to_pushed_events() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut prefs = NotificationPreferences::default();
    prefs.minimum_priority = NotificationPriority::High;
    backend.set_preferences(prefs);

    let mut pipeline =
        TestPipeline::start_with_backend(helpers::toast_config(5, 5000), backend).await;

    pipeline
        .push(helpers::notification(NotificationCategory::Workflow, NotificationPriority::Medium))
        .await;
    pipeline
        .push(helpers::notification(NotificationCategory::Workflow, NotificationPriority::High))
        .await;
    pipeline
        .push(helpers::notification(NotificationCategory::Workflow, NotificationPriority::Urgent))
        .await;

    // The medium event is gone entirely, not stored silently.
    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.toasts.len(), 2);

    let events = pipeline.drain_ui();
    let added = events
        .iter()
        .filter(|e| matches!(e, UiEvent::NotificationAdded { .. }))
        .count();
    assert_eq!(added, 2);

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_quiet_hours_stores_without_toasting() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut prefs = NotificationPreferences::default();
    let now = Utc::now();
    prefs.quiet_hours.enabled = true;
    prefs.quiet_hours.start = (now - chrono::Duration::hours(1)).format("%H:%M").to_string();
    prefs.quiet_hours.end = (now + chrono::Duration::hours(1)).format("%H:%M").to_string();
    backend.set_preferences(prefs);

    let mut pipeline =
        TestPipeline::start_with_backend(helpers::toast_config(5, 5000), backend).await;

    // Quiet hours hold back even urgent toasts; only the pop-up is suppressed.
    pipeline
        .push(helpers::notification(NotificationCategory::Security, NotificationPriority::Urgent))
        .await;

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.unread, 1);
    assert!(snapshot.toasts.is_empty());

    let events = pipeline.drain_ui();
    assert!(events.iter().any(|e| matches!(e, UiEvent::NotificationAdded { .. })));
    assert!(!events.iter().any(|e| matches!(e, UiEvent::ToastPushed { .. })));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_beyond_toast_limit_keeps_newest() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(1, 5000)).await;

    let first = helpers::notification(NotificationCategory::Document, NotificationPriority::Medium);
    let first_id = first.id;
    let mut second = helpers::notification(NotificationCategory::Document, NotificationPriority::Medium);
    second.title = "Second deal room update".to_string();
    let second_id = second.id;

    pipeline.push(first).await;
    pipeline.push(second).await;

    // Both records survive; the overlay keeps only the newest.
    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.unread, 2);
    assert_eq!(snapshot.toasts.len(), 1);
    assert_eq!(snapshot.toasts[0].notification.id, second_id);

    let events = pipeline.drain_ui();
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::ToastRemoved { id, reason: ToastCloseReason::Evicted } if *id == first_id
    )));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_replayed_push_updates_in_place() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    let original = helpers::notification(NotificationCategory::Workflow, NotificationPriority::Medium);
    pipeline.push(original.clone()).await;

    // An immediate replay inside the dedup window is suppressed outright.
    pipeline.push(original.clone()).await;
    assert_eq!(pipeline.engine.snapshot().total, 1);

    // Past the window the replay lands as an in-place update instead.
    helpers::run_ticks(6).await;
    let mut replayed = original.clone();
    replayed.title = "Deal room update (revised)".to_string();
    pipeline.push(replayed).await;

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.notifications[0].title, "Deal room update (revised)");
    // Updated records never re-toast.
    assert_eq!(snapshot.toasts.len(), 1);

    let events = pipeline.drain_ui();
    let added = events
        .iter()
        .filter(|e| matches!(e, UiEvent::NotificationAdded { .. }))
        .count();
    assert_eq!(added, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::NotificationUpdated { notification } if notification.title == "Deal room update (revised)"
    )));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_clears_record_and_toast() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    let incoming =
        helpers::notification(NotificationCategory::Collaboration, NotificationPriority::High);
    let id = incoming.id;
    pipeline.push(incoming).await;

    pipeline.engine.dismiss(id).await;

    let snapshot = pipeline.engine.snapshot();
    assert!(snapshot.toasts.is_empty());
    assert!(snapshot.notifications.is_empty());
    assert_eq!(snapshot.total, 0);
    assert_eq!(snapshot.unread, 0);

    let events = pipeline.drain_ui();
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::ToastRemoved { reason: ToastCloseReason::Dismissed, .. }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::NotificationUpdated { notification } if notification.dismissed_at.is_some()
    )));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_store_writes_reach_backend_in_order() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;

    let a = helpers::notification(NotificationCategory::Document, NotificationPriority::Medium);
    let a_id = a.id;
    let b = helpers::notification(NotificationCategory::Workflow, NotificationPriority::Medium);
    let b_id = b.id;
    let c = helpers::notification(NotificationCategory::System, NotificationPriority::Low);

    pipeline.push(a).await;
    pipeline.push(b).await;
    pipeline.push(c).await;

    pipeline.engine.mark_read(a_id).await;
    pipeline.engine.dismiss(b_id).await;
    pipeline.engine.mark_all_read().await;

    assert_eq!(
        pipeline.backend.recorded_calls(),
        vec![
            "fetch_preferences".to_string(),
            "fetch_notifications".to_string(),
            format!("mark_read:{a_id}"),
            format!("dismiss:{b_id}"),
            "mark_all_read".to_string(),
        ]
    );

    // Repeating a dismiss is a local no-op and never reaches the backend.
    pipeline.engine.dismiss(b_id).await;
    assert_eq!(pipeline.backend.recorded_calls().len(), 5);

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.unread, 0);
    assert_eq!(snapshot.total, 2);

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_connection_status_reaches_subscribers() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    assert_eq!(
        *pipeline.engine.connection_status().borrow(),
        ConnectionStatus::Disconnected
    );

    pipeline
        .send(SourceEvent::Status(ConnectionStatus::Connected))
        .await;
    assert_eq!(
        *pipeline.engine.connection_status().borrow(),
        ConnectionStatus::Connected
    );

    pipeline
        .send(SourceEvent::Status(ConnectionStatus::Reconnecting { attempt: 2 }))
        .await;
    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.connection, ConnectionStatus::Reconnecting { attempt: 2 });

    let events = pipeline.drain_ui();
    assert!(events
        .iter()
        .any(|e| matches!(e, UiEvent::Connection { status: ConnectionStatus::Connected })));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_activity_entries_flow_to_feed() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;

    let stage_change =
        ActivityEntry::new(ActivityType::DealStageChanged, "Sarah Chen", "Project Meridian");
    pipeline.send(SourceEvent::Activity(stage_change)).await;
    let comment =
        ActivityEntry::new(ActivityType::CommentAdded, "Miguel Torres", "Q3 valuation model");
    pipeline.send(SourceEvent::Activity(comment)).await;

    let recent = pipeline.engine.recent_activity(10);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].actor, "Miguel Torres");

    let events = pipeline.drain_ui();
    let added = events
        .iter()
        .filter(|e| matches!(e, UiEvent::ActivityAdded { .. }))
        .count();
    assert_eq!(added, 2);

    pipeline.stop().await;
}
