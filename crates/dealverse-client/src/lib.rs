//! # dealverse-client
//!
//! REST client for the DealVerse backend. The [`NotificationBackend`]
//! trait is the seam the notification engine talks through: the live
//! implementation ([`HttpBackend`]) calls the backend over HTTP, while
//! [`InMemoryBackend`] backs tests and offline development.

pub mod api;
pub mod http;
pub mod memory;

pub use api::{ApiErrorBody, DataEnvelope, ErrorEnvelope, NotificationBackend};
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
