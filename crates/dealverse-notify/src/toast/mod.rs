//! Bounded, self-expiring toast queue with pausable countdowns.

mod position;

pub use position::ToastPosition;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use dealverse_core::config::ToastConfig;
use dealverse_core::result::AppResult;
use dealverse_core::types::NotificationId;
use dealverse_entity::notification::LiveNotification;

use crate::events::{ToastCloseReason, UiEvent};

/// A toast as the overlay layer should render it.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    /// The notification being shown.
    pub notification: LiveNotification,
    /// Stack slot, 0 = newest.
    pub slot: usize,
    /// Pixel offset from the anchor for this slot.
    pub offset_px: u32,
    /// Countdown progress remaining, 100.0 down to 0.0.
    pub progress: f32,
    /// Whether the countdown is paused.
    pub paused: bool,
}

#[derive(Debug)]
struct ToastEntry {
    notification: LiveNotification,
    duration_ms: u64,
    remaining_ms: u64,
    paused: bool,
    cancel: CancellationToken,
}

impl ToastEntry {
    fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.remaining_ms as f32 / self.duration_ms as f32) * 100.0
    }
}

/// Bounded queue of transient toasts, newest first.
///
/// Every toast owns an independent countdown task; the countdown removes
/// the toast when it reaches zero. Removing a toast never touches the
/// store record behind it. Dropping the scheduler cancels every
/// outstanding countdown.
#[derive(Debug)]
pub struct ToastScheduler {
    config: ToastConfig,
    position: ToastPosition,
    queue: Mutex<VecDeque<ToastEntry>>,
    events: broadcast::Sender<UiEvent>,
    /// Parent of every countdown token.
    root: CancellationToken,
}

impl ToastScheduler {
    /// Create a scheduler. Fails if the configured anchor position is
    /// not one of the six known values.
    pub fn new(config: ToastConfig, events: broadcast::Sender<UiEvent>) -> AppResult<Self> {
        let position = config.position.parse::<ToastPosition>()?;
        Ok(Self {
            config,
            position,
            queue: Mutex::new(VecDeque::new()),
            events,
            root: CancellationToken::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ToastEntry>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }

    /// The configured anchor position.
    pub fn position(&self) -> ToastPosition {
        self.position
    }

    /// Number of toasts currently visible.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the overlay is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Prepend a toast and start its countdown.
    ///
    /// Returns `false` if a toast for this notification is already
    /// visible. Excess toasts beyond the queue limit are evicted from
    /// the back, oldest first.
    pub fn push(self: &Arc<Self>, notification: LiveNotification) -> bool {
        let id = notification.id;
        let cancel = self.root.child_token();
        let mut evicted = Vec::new();
        {
            let mut queue = self.lock();
            if queue.iter().any(|e| e.notification.id == id) {
                return false;
            }
            queue.push_front(ToastEntry {
                notification: notification.clone(),
                duration_ms: self.config.duration_ms,
                remaining_ms: self.config.duration_ms,
                paused: false,
                cancel: cancel.clone(),
            });
            while queue.len() > self.config.max_toasts {
                if let Some(entry) = queue.pop_back() {
                    entry.cancel.cancel();
                    evicted.push(entry.notification.id);
                }
            }
        }
        for evicted_id in evicted {
            debug!(id = %evicted_id, "Toast evicted past queue limit");
            self.emit(UiEvent::ToastRemoved {
                id: evicted_id,
                reason: ToastCloseReason::Evicted,
            });
        }
        self.emit(UiEvent::ToastPushed {
            toast: Toast {
                notification,
                slot: 0,
                offset_px: 0,
                progress: 100.0,
                paused: false,
            },
        });
        self.spawn_countdown(id, cancel);
        true
    }

    fn spawn_countdown(self: &Arc<Self>, id: NotificationId, cancel: CancellationToken) {
        // Hold the scheduler weakly so countdown tasks never keep it
        // alive past its last external handle.
        let weak = Arc::downgrade(self);
        let tick = Duration::from_millis(self.config.tick_ms);
        tokio::spawn(async move {
            let mut interval = time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(scheduler) = weak.upgrade() else {
                            break;
                        };
                        if !scheduler.advance(id) {
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Advance one countdown by a tick. Returns whether the countdown
    /// should keep running.
    fn advance(&self, id: NotificationId) -> bool {
        let (event, keep) = {
            let mut queue = self.lock();
            let Some(index) = queue.iter().position(|e| e.notification.id == id) else {
                return false;
            };
            if queue[index].paused {
                return true;
            }
            queue[index].remaining_ms =
                queue[index].remaining_ms.saturating_sub(self.config.tick_ms);
            if queue[index].remaining_ms == 0 {
                if let Some(entry) = queue.remove(index) {
                    entry.cancel.cancel();
                }
                (
                    UiEvent::ToastRemoved {
                        id,
                        reason: ToastCloseReason::Expired,
                    },
                    false,
                )
            } else {
                (
                    UiEvent::ToastProgress {
                        id,
                        progress: queue[index].progress(),
                        paused: false,
                    },
                    true,
                )
            }
        };
        self.emit(event);
        keep
    }

    /// Remove a toast before its countdown ends.
    pub fn remove(&self, id: NotificationId, reason: ToastCloseReason) -> bool {
        let removed = {
            let mut queue = self.lock();
            match queue.iter().position(|e| e.notification.id == id) {
                Some(index) => queue.remove(index),
                None => None,
            }
        };
        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                self.emit(UiEvent::ToastRemoved { id, reason });
                true
            }
            None => false,
        }
    }

    /// Remove every toast. Returns how many were removed.
    pub fn clear(&self, reason: ToastCloseReason) -> usize {
        let drained: Vec<ToastEntry> = {
            let mut queue = self.lock();
            queue.drain(..).collect()
        };
        let count = drained.len();
        for entry in drained {
            entry.cancel.cancel();
            self.emit(UiEvent::ToastRemoved {
                id: entry.notification.id,
                reason,
            });
        }
        count
    }

    /// Freeze a countdown at its current progress.
    pub fn pause(&self, id: NotificationId) -> bool {
        let progress = {
            let mut queue = self.lock();
            let Some(entry) = queue.iter_mut().find(|e| e.notification.id == id) else {
                return false;
            };
            entry.paused = true;
            entry.progress()
        };
        self.emit(UiEvent::ToastProgress {
            id,
            progress,
            paused: true,
        });
        true
    }

    /// Resume a paused countdown from where it stopped.
    pub fn resume(&self, id: NotificationId) -> bool {
        let progress = {
            let mut queue = self.lock();
            let Some(entry) = queue.iter_mut().find(|e| e.notification.id == id) else {
                return false;
            };
            entry.paused = false;
            entry.progress()
        };
        self.emit(UiEvent::ToastProgress {
            id,
            progress,
            paused: false,
        });
        true
    }

    /// The overlay as it should render right now, newest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        let queue = self.lock();
        queue
            .iter()
            .enumerate()
            .map(|(slot, entry)| Toast {
                notification: entry.notification.clone(),
                slot,
                offset_px: (slot as u32) * self.config.stack_offset_px,
                progress: entry.progress(),
                paused: entry.paused,
            })
            .collect()
    }

    /// Cancel every countdown and empty the overlay without events.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.lock().clear();
    }
}

impl Drop for ToastScheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
