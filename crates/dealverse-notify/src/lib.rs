//! # dealverse-notify
//!
//! Live notification engine for DealVerse OS. Provides:
//!
//! - In-memory notification store with read/dismiss/expiry lifecycle
//! - Preference gate (categories, channels, priority threshold, quiet hours)
//! - Self-expiring toast queue with pausable per-toast countdowns
//! - Quiet-hours digest collection
//! - Append-only activity feed with display formatting
//! - WebSocket push source with exponential-backoff reconnect

pub mod dedup;
pub mod digest;
pub mod engine;
pub mod events;
pub mod feed;
pub mod gate;
pub mod source;
pub mod store;
pub mod toast;

pub use engine::{EngineSnapshot, NotificationEngine};
pub use events::{ToastCloseReason, UiEvent};
pub use feed::ActivityFeed;
pub use gate::PreferenceGate;
pub use source::{ConnectionStatus, EventSource, SourceEvent};
pub use store::NotificationStore;
pub use toast::{Toast, ToastPosition, ToastScheduler};
