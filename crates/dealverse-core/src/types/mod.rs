//! Shared type definitions used across the pipeline crates.

pub mod id;

pub use id::{ActivityId, NotificationId, UserId};
