//! Input: Event vocabulary, the crossterm adapter, and routing over a scene.

mod backend;
mod events;
mod router;

pub use backend::{convert_event, MouseTracker};
pub use events::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseButtons, MouseEvent, MouseEventArgs, MouseState,
    ObjectMouseState, SceneEvent,
};
