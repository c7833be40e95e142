//! Toast scheduler configuration.

use serde::{Deserialize, Serialize};

/// Settings for the transient toast layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Maximum toasts visible at once.
    #[serde(default = "default_max_toasts")]
    pub max_toasts: usize,
    /// Countdown duration in milliseconds before a toast auto-dismisses.
    #[serde(default = "default_duration")]
    pub duration_ms: u64,
    /// Countdown tick interval in milliseconds.
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
    /// Screen anchor for the toast stack. One of `top-left`, `top-center`,
    /// `top-right`, `bottom-left`, `bottom-center`, `bottom-right`.
    #[serde(default = "default_position")]
    pub position: String,
    /// Vertical offset in pixels between stacked toasts.
    #[serde(default = "default_stack_offset")]
    pub stack_offset_px: u32,
    /// Buffer size of the UI event broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_toasts: default_max_toasts(),
            duration_ms: default_duration(),
            tick_ms: default_tick(),
            position: default_position(),
            stack_offset_px: default_stack_offset(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_max_toasts() -> usize {
    5
}

fn default_duration() -> u64 {
    5000
}

fn default_tick() -> u64 {
    100
}

fn default_position() -> String {
    "bottom-right".to_string()
}

fn default_stack_offset() -> u32 {
    110
}

fn default_event_buffer() -> usize {
    256
}
