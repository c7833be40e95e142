//! Notification entity models: the live notification record, its closed
//! enums, action descriptors, delivery markers, and user preferences.

pub mod action;
pub mod category;
pub mod delivery;
pub mod kind;
pub mod model;
pub mod preference;
pub mod priority;

pub use action::{ActionStyle, NotificationAction};
pub use category::NotificationCategory;
pub use delivery::{DeliveryChannel, DeliveryState};
pub use kind::NotificationKind;
pub use model::LiveNotification;
pub use preference::{CategoryToggles, ChannelToggles, NotificationPreferences, QuietHours};
pub use priority::NotificationPriority;
