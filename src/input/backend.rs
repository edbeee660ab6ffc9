//! Input backend glue: crossterm conversion and per-frame mouse folding.
//!
//! Polling the terminal is left to the application; it hands each
//! `crossterm::event::Event` to [`convert_event`] and feeds the result to
//! the host. Terminal mouse coordinates are cells, which equal pixels with
//! the default unit font.

use super::events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseButtons, MouseEvent, MouseState};
use crate::geometry::Point;
use crossterm::event::{self, Event, KeyEventKind};

/// Convert a crossterm event to an [`InputEvent`].
///
/// Only key presses are kept (not releases or repeats); keys and mouse
/// actions with no counterpart map to `None`.
pub fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key_event) => {
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            let code = convert_key_code(key_event.code)?;
            let modifiers = convert_modifiers(key_event.modifiers);
            Some(InputEvent::Key(KeyEvent { code, modifiers }))
        }
        Event::Mouse(mouse_event) => convert_mouse_event(mouse_event),
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
        Event::Paste(text) => Some(InputEvent::Paste(text)),
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
        super_key: mods.contains(event::KeyModifiers::SUPER),
    }
}

fn convert_mouse_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_mouse_event(mouse: event::MouseEvent) -> Option<InputEvent> {
    let position = Point::new(i32::from(mouse.column), i32::from(mouse.row));
    let modifiers = convert_modifiers(mouse.modifiers);
    let build = |button: Option<event::MouseButton>| MouseEvent {
        position,
        button: button.map(convert_mouse_button),
        modifiers,
    };

    match mouse.kind {
        event::MouseEventKind::Down(button) => Some(InputEvent::MouseDown(build(Some(button)))),
        event::MouseEventKind::Up(button) => Some(InputEvent::MouseUp(build(Some(button)))),
        event::MouseEventKind::Moved => Some(InputEvent::MouseMove(build(None))),
        event::MouseEventKind::Drag(button) => Some(InputEvent::MouseMove(build(Some(button)))),
        event::MouseEventKind::ScrollUp => Some(InputEvent::MouseScroll { position, delta: 1 }),
        event::MouseEventKind::ScrollDown => Some(InputEvent::MouseScroll { position, delta: -1 }),
        _ => None,
    }
}

/// Folds raw mouse events into one [`MouseState`] per frame.
///
/// A button counts as clicked when it goes down and comes back up; the
/// release must land within the same frame or a later one. Clicks and
/// scroll accumulate until [`MouseTracker::frame`] takes them.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    state: MouseState,
}

impl MouseTracker {
    /// Create a tracker with the pointer at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state without consuming clicks.
    pub const fn state(&self) -> &MouseState {
        &self.state
    }

    /// Apply one input event. Returns `true` if it was a mouse event.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::MouseDown(mouse) => {
                self.track(mouse);
                if let Some(button) = mouse.button {
                    self.state.buttons_down |= MouseButtons::from(button);
                }
            }
            InputEvent::MouseUp(mouse) => {
                self.track(mouse);
                if let Some(button) = mouse.button {
                    let button = MouseButtons::from(button);
                    if self.state.buttons_down.contains(button) {
                        self.state.clicked |= button;
                    }
                    self.state.buttons_down.remove(button);
                }
            }
            InputEvent::MouseMove(mouse) => self.track(mouse),
            InputEvent::MouseScroll { position, delta } => {
                self.state.position = *position;
                self.state.scroll_delta = self.state.scroll_delta.saturating_add(*delta);
            }
            _ => return false,
        }
        true
    }

    /// Forget held buttons without turning them into clicks.
    pub fn release_buttons(&mut self) {
        self.state.buttons_down = MouseButtons::empty();
    }

    /// Take this frame's state, resetting clicks and scroll.
    pub fn frame(&mut self) -> MouseState {
        let state = self.state;
        self.state.clicked = MouseButtons::empty();
        self.state.scroll_delta = 0;
        state
    }

    fn track(&mut self, mouse: &MouseEvent) {
        self.state.position = mouse.position;
        self.state.modifiers = mouse.modifiers;
    }
}
