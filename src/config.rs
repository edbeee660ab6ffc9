//! Host configuration.

use crate::render::FontRef;

/// Configuration for the [`GameHost`](crate::GameHost) and the objects its
/// scene creates.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Font given to newly spawned objects.
    pub default_font: FontRef,
    /// Whether new objects take part in mouse hit-testing.
    pub use_mouse: bool,
    /// Whether new objects accept keyboard input when focused.
    pub use_keyboard: bool,
    /// Whether new objects take focus when left-clicked.
    pub focus_on_click: bool,
    /// Capacity of each scene event channel (`None` = unbounded).
    pub event_channel_capacity: Option<usize>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_font: FontRef::default(),
            use_mouse: true,
            use_keyboard: true,
            focus_on_click: true,
            event_channel_capacity: None,
        }
    }
}
