//! Toast countdown behavior as driven through the engine.

mod helpers;

use dealverse_entity::notification::{
    ActionStyle, NotificationAction, NotificationCategory, NotificationPriority,
};
use dealverse_notify::{ToastCloseReason, UiEvent};

use helpers::TestPipeline;

#[tokio::test(start_paused = true)]
async fn test_expiry_leaves_record_unread() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 500)).await;
    let incoming = helpers::notification(NotificationCategory::Document, NotificationPriority::Medium);
    let id = incoming.id;
    pipeline.push(incoming).await;

    helpers::run_ticks(5).await;

    // The toast and the record have independent lifecycles.
    let snapshot = pipeline.engine.snapshot();
    assert!(snapshot.toasts.is_empty());
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.unread, 1);
    assert!(snapshot.notifications[0].read_at.is_none());

    let events = pipeline.drain_ui();
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::ToastRemoved { id: removed, reason: ToastCloseReason::Expired } if *removed == id
    )));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_ten_caps_overlay_at_three() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(3, 5000)).await;

    for _ in 0..10 {
        pipeline
            .push(helpers::notification(NotificationCategory::Workflow, NotificationPriority::Medium))
            .await;
        assert!(pipeline.engine.snapshot().toasts.len() <= 3);
    }

    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.toasts.len(), 3);
    assert_eq!(snapshot.total, 10);
    assert_eq!(snapshot.unread, 10);

    let events = pipeline.drain_ui();
    let evicted = events
        .iter()
        .filter(|e| matches!(e, UiEvent::ToastRemoved { reason: ToastCloseReason::Evicted, .. }))
        .count();
    assert_eq!(evicted, 7);

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_countdown_through_engine() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 1000)).await;
    let incoming =
        helpers::notification(NotificationCategory::Collaboration, NotificationPriority::Medium);
    let id = incoming.id;
    pipeline.push(incoming).await;

    helpers::run_ticks(4).await;
    assert!(pipeline.engine.pause_toast(id));

    // A paused toast outlives any amount of elapsed time.
    helpers::run_ticks(50).await;
    let snapshot = pipeline.engine.snapshot();
    assert_eq!(snapshot.toasts.len(), 1);
    assert!(snapshot.toasts[0].paused);
    assert!((snapshot.toasts[0].progress - 60.0).abs() < 0.01);

    assert!(pipeline.engine.resume_toast(id));
    helpers::run_ticks(6).await;

    let snapshot = pipeline.engine.snapshot();
    assert!(snapshot.toasts.is_empty());
    assert_eq!(snapshot.unread, 1);

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_action_completion_short_circuits_countdown() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    let mut incoming =
        helpers::notification(NotificationCategory::Workflow, NotificationPriority::High);
    incoming.actions.push(NotificationAction::new(
        "approve",
        "Approve",
        ActionStyle::Primary,
    ));
    let id = incoming.id;
    pipeline.push(incoming).await;

    pipeline
        .engine
        .execute_action(id, "approve")
        .await
        .expect("action succeeds");

    // Completing an action retires the toast but not the record.
    let snapshot = pipeline.engine.snapshot();
    assert!(snapshot.toasts.is_empty());
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.unread, 1);

    let events = pipeline.drain_ui();
    assert!(events.iter().any(|e| matches!(
        e,
        UiEvent::ToastRemoved { id: removed, reason: ToastCloseReason::Action } if *removed == id
    )));
    assert!(pipeline
        .backend
        .recorded_calls()
        .contains(&format!("execute_action:{id}:approve")));

    pipeline.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_outstanding_countdowns() {
    let mut pipeline = TestPipeline::start(helpers::toast_config(5, 5000)).await;
    pipeline
        .push(helpers::notification(NotificationCategory::Document, NotificationPriority::Medium))
        .await;
    pipeline
        .push(helpers::notification(NotificationCategory::System, NotificationPriority::Low))
        .await;
    pipeline.drain_ui();

    pipeline.stop().await;
    helpers::run_ticks(60).await;

    // Countdowns die with the engine instead of firing into the void.
    let events = pipeline.drain_ui();
    assert!(!events.iter().any(|e| matches!(e, UiEvent::ToastRemoved { .. })));
    assert!(!events.iter().any(|e| matches!(e, UiEvent::ToastProgress { .. })));
    assert!(pipeline.engine.snapshot().toasts.is_empty());
}
