//! Activity feed entities.

mod model;

pub use model::{ActivityEntry, ActivityType};
