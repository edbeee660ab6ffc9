//! Input and notification message types.
//!
//! [`InputEvent`] is what an input backend feeds in. [`MouseState`] is the
//! per-frame mouse summary the router resolves against the scene.
//! [`SceneEvent`] is what the router sends out to listeners.

use crate::geometry::Point;
use crate::scene::ObjectId;
use bitflags::bitflags;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
    /// Super/Command/Windows key held.
    pub super_key: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        super_key: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.super_key
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during the press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

bitflags! {
    /// A set of mouse buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Left button.
        const LEFT = 0b0000_0001;
        /// Right button.
        const RIGHT = 0b0000_0010;
        /// Middle button.
        const MIDDLE = 0b0000_0100;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

impl MouseButtons {
    /// The individual buttons in the set, left first.
    pub fn buttons(self) -> impl Iterator<Item = MouseButton> {
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
            .into_iter()
            .filter(move |b| self.contains(Self::from(*b)))
    }
}

/// Raw mouse event from a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Screen position in pixels (cells for terminal backends).
    pub position: Point,
    /// Mouse button involved (if any).
    pub button: Option<MouseButton>,
    /// Key modifiers held during mouse event.
    pub modifiers: KeyModifiers,
}

/// Events fed in by an input backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyEvent),

    /// Mouse button pressed.
    MouseDown(MouseEvent),

    /// Mouse button released.
    MouseUp(MouseEvent),

    /// Mouse moved.
    MouseMove(MouseEvent),

    /// Mouse scroll.
    MouseScroll {
        /// Screen position.
        position: Point,
        /// Scroll delta (positive = up, negative = down).
        delta: i16,
    },

    /// Display was resized.
    Resize {
        /// New width in cells.
        width: u16,
        /// New height in cells.
        height: u16,
    },

    /// Window focus gained.
    FocusGained,

    /// Window focus lost.
    FocusLost,

    /// Paste event (bracketed paste).
    Paste(String),
}

/// Mouse state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseState {
    /// Screen position in pixels.
    pub position: Point,
    /// Buttons currently held.
    pub buttons_down: MouseButtons,
    /// Buttons pressed and released since the previous frame.
    pub clicked: MouseButtons,
    /// Accumulated scroll since the previous frame.
    pub scroll_delta: i16,
    /// Modifiers held at the last mouse event.
    pub modifiers: KeyModifiers,
}

impl MouseState {
    /// A state with the pointer at `position` and nothing pressed.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same state with `button` clicked this frame.
    #[must_use]
    pub fn with_click(mut self, button: MouseButton) -> Self {
        self.clicked |= MouseButtons::from(button);
        self
    }
}

/// Mouse state resolved against one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMouseState {
    /// The object the state was resolved against.
    pub object: ObjectId,
    /// Pointer position in pixels, relative to the object's top-left.
    pub pixel_position: Point,
    /// Cell under the pointer, relative to the object's view.
    pub cell_position: Point,
    /// Whether the pointer is inside the object's area.
    pub is_on_object: bool,
    /// The frame's mouse state.
    pub mouse: MouseState,
}

/// A mouse event travelling through the handler chain.
///
/// Any handler may set `handled`; once set, the event is not offered to
/// further handlers or to containing objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEventArgs {
    /// State relative to the object whose handler is running.
    pub state: ObjectMouseState,
    /// Stop propagation when true.
    pub handled: bool,
}

/// Notifications sent to scene listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The pointer entered an object.
    MouseEnter(ObjectMouseState),
    /// The pointer moved within an object.
    MouseMove(ObjectMouseState),
    /// The pointer left an object (or the object left the scene).
    MouseExit(ObjectId),
    /// A button was clicked on an object.
    MouseButtonClicked {
        /// Where the click landed.
        state: ObjectMouseState,
        /// Which button.
        button: MouseButton,
    },
    /// An object gained focus.
    Focused(ObjectId),
    /// An object lost focus.
    FocusLost(ObjectId),
}

impl SceneEvent {
    /// The object the event is about.
    pub const fn object(&self) -> ObjectId {
        match self {
            Self::MouseEnter(state) | Self::MouseMove(state) | Self::MouseButtonClicked { state, .. } => state.object,
            Self::MouseExit(id) | Self::Focused(id) | Self::FocusLost(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_buttons_iterate_in_order() {
        let set = MouseButtons::MIDDLE | MouseButtons::LEFT;
        let buttons: Vec<_> = set.buttons().collect();
        assert_eq!(buttons, [MouseButton::Left, MouseButton::Middle]);
    }

    #[test]
    fn test_key_modifiers_any() {
        assert!(!KeyModifiers::NONE.any());
        let mods = KeyModifiers {
            control: true,
            ..KeyModifiers::NONE
        };
        assert!(mods.any());
    }

    #[test]
    fn test_with_click() {
        let state = MouseState::at(Point::new(3, 4)).with_click(MouseButton::Right);
        assert!(state.clicked.contains(MouseButtons::RIGHT));
        assert!(state.buttons_down.is_empty());
    }
}
