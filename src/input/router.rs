//! Input routing: Resolving mouse and keyboard input against a [`Scene`].
//!
//! Each frame the mouse is resolved to at most one target object: the
//! object holding an exclusive capture, or else the topmost mouse-enabled
//! object under the pointer. When the target changes, the previous target
//! gets its exit before the new target is processed.
//!
//! The target's mouse handlers run first. If none marks the event handled,
//! the built-in behavior runs (enter, move, click, focus-on-click) and the
//! event bubbles up through mouse-enabled ancestors' handlers until one
//! marks it handled.
//!
//! Keyboard input goes to the focused object and bubbles up through
//! keyboard-enabled ancestors until a handler consumes it.

use super::events::{KeyEvent, MouseButtons, MouseEventArgs, MouseState, SceneEvent};
use crate::error::Result;
use crate::scene::{FocusBehavior, ObjectId, Scene, SceneObject};

impl Scene {
    /// Object holding focus, if any.
    pub fn focused(&self) -> Option<ObjectId> {
        self.focus.last().copied()
    }

    /// The focus stack, bottom first. The last entry holds focus.
    pub fn focus_stack(&self) -> &[ObjectId] {
        &self.focus
    }

    /// Object the mouse resolved to on the last frame.
    pub const fn mouse_target(&self) -> Option<ObjectId> {
        self.last_mouse
    }

    /// Give focus to `id`, replacing the focused object.
    pub fn set_focus(&mut self, id: ObjectId) -> Result<()> {
        self.require(id)?;
        self.focus_with(id, FocusBehavior::Set);
        Ok(())
    }

    /// Give focus to `id`, keeping the focused object beneath it on the stack.
    pub fn push_focus(&mut self, id: ObjectId) -> Result<()> {
        self.require(id)?;
        self.focus_with(id, FocusBehavior::Push);
        Ok(())
    }

    /// Drop the focused object from the stack; the one beneath regains focus.
    pub fn pop_focus(&mut self) -> Option<ObjectId> {
        let top = self.focus.pop()?;
        self.lose_focus(top);
        if let Some(next) = self.focused() {
            self.gain_focus(next);
        }
        log::debug!("pop focus {top}, now {:?}", self.focused());
        Some(top)
    }

    /// Empty the focus stack.
    pub fn clear_focus(&mut self) {
        if let Some(top) = self.focus.pop() {
            self.lose_focus(top);
        }
        self.focus.clear();
    }

    /// End any exclusive capture and forget the last mouse target.
    ///
    /// The object holding the capture has its exclusive flag cleared, and
    /// the last target gets an exit. The next frame resolves by hit-testing
    /// unless another object still holds a capture.
    pub fn release_mouse(&mut self) {
        if let Some(holder) = self.capture_target() {
            if let Some(object) = self.get_mut(holder) {
                object.set_exclusive_mouse(false);
            }
            log::debug!("release mouse capture held by {holder}");
        }
        if let Some(last) = self.last_mouse.take() {
            self.mouse_left(last);
            log::debug!("release mouse from {last}");
        }
    }

    /// Resolve one frame of mouse state. Returns the target, if any.
    pub fn process_mouse(&mut self, mouse: &MouseState) -> Option<ObjectId> {
        let target = self.capture_target().or_else(|| self.hit_test(mouse.position));
        log::trace!("mouse at {:?} resolved to {target:?}", mouse.position);

        if self.last_mouse != target {
            if let Some(previous) = self.last_mouse {
                self.mouse_left(previous);
            }
        }
        self.last_mouse = target;

        if let Some(target) = target {
            self.dispatch_mouse(target, mouse);
        }
        target
    }

    /// Offer a key press to the focused object, then its ancestors.
    ///
    /// Returns `true` when a handler consumed the key.
    pub fn process_keyboard(&mut self, key: &KeyEvent) -> bool {
        let Some(target) = self.focused() else {
            return false;
        };

        for id in self.ancestors_and_self(target) {
            let Some(object) = self.get_mut(id) else {
                continue;
            };
            if !object.use_keyboard() || !object.is_enabled() {
                continue;
            }
            for handler in &mut object.keyboard_handlers {
                if handler(key) {
                    log::trace!("key {:?} consumed by {id}", key.code);
                    return true;
                }
            }
        }
        false
    }

    /// Exclusive capture: the last target if it is exclusive, else the
    /// focused object if it is, else the topmost visible exclusive object.
    ///
    /// Hidden or disabled objects never hold a capture.
    fn capture_target(&self) -> Option<ObjectId> {
        let exclusive = |id: &ObjectId| self.can_capture(*id);
        self.last_mouse
            .filter(exclusive)
            .or_else(|| self.focused().filter(exclusive))
            .or_else(|| self.draw_order().into_iter().rev().find(exclusive))
    }

    fn can_capture(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(|o| o.is_exclusive_mouse() && o.is_enabled())
            && self
                .ancestors_and_self(id)
                .into_iter()
                .all(|ancestor| self.get(ancestor).is_some_and(SceneObject::is_visible))
    }

    fn dispatch_mouse(&mut self, target: ObjectId, mouse: &MouseState) {
        let mut handled = false;
        for (depth, id) in self.ancestors_and_self(target).into_iter().enumerate() {
            let Some(object) = self.get_mut(id) else {
                continue;
            };
            if depth > 0 && (!object.use_mouse() || !object.is_enabled()) {
                continue;
            }

            let mut args = MouseEventArgs {
                state: object.mouse_state(mouse),
                handled,
            };
            for handler in &mut object.mouse_handlers {
                handler(&mut args);
                if args.handled {
                    break;
                }
            }
            handled = args.handled;

            if handled {
                log::trace!("mouse handled by {id}");
                break;
            }
            if depth == 0 {
                self.default_mouse_behavior(target, mouse);
            }
        }
    }

    /// Built-in enter, move, click and focus-on-click behavior.
    ///
    /// A move is sent whenever the pointer's pixel position on the object
    /// changes, even within one cell.
    fn default_mouse_behavior(&mut self, id: ObjectId, mouse: &MouseState) {
        let mut events = Vec::new();
        let mut focus = None;

        {
            let Some(object) = self.get_mut(id) else {
                return;
            };
            let state = object.mouse_state(mouse);

            if state.is_on_object {
                if !object.mouse_over {
                    object.mouse_over = true;
                    object.last_mouse_position = None;
                    events.push(SceneEvent::MouseEnter(state));
                }
                if object.last_mouse_position != Some(state.pixel_position) {
                    object.last_mouse_position = Some(state.pixel_position);
                    events.push(SceneEvent::MouseMove(state));
                }
                for button in mouse.clicked.buttons() {
                    events.push(SceneEvent::MouseButtonClicked { state, button });
                }
                if mouse.clicked.contains(MouseButtons::LEFT) && object.focus_on_click() && !object.focused {
                    focus = Some(object.focus_mode());
                }
            } else if object.mouse_over {
                object.mouse_over = false;
                object.last_mouse_position = None;
                events.push(SceneEvent::MouseExit(id));
            }
        }

        for event in events {
            self.emit(event);
        }
        if let Some(mode) = focus {
            self.focus_with(id, mode);
        }
    }

    fn mouse_left(&mut self, id: ObjectId) {
        let Some(object) = self.get_mut(id) else {
            return;
        };
        object.last_mouse_position = None;
        if object.mouse_over {
            object.mouse_over = false;
            log::trace!("mouse exit {id}");
            self.emit(SceneEvent::MouseExit(id));
        }
    }

    fn focus_with(&mut self, id: ObjectId, mode: FocusBehavior) {
        if self.focused() == Some(id) {
            return;
        }

        if let Some(previous) = self.focused() {
            self.lose_focus(previous);
            if mode == FocusBehavior::Set {
                self.focus.pop();
            }
        }
        self.focus.retain(|f| *f != id);
        self.focus.push(id);
        self.gain_focus(id);
        log::debug!("focus {id} ({mode:?})");
    }

    fn lose_focus(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            if object.focused {
                object.focused = false;
                self.emit(SceneEvent::FocusLost(id));
            }
        }
    }

    fn gain_focus(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            if !object.focused {
                object.focused = true;
                self.emit(SceneEvent::Focused(id));
            }
        }
    }

    /// Drop all input state held by objects about to leave the scene.
    pub(crate) fn forget_input(&mut self, ids: &[ObjectId]) {
        let old_top = self.focused();

        for &id in ids {
            if self.last_mouse == Some(id) {
                self.last_mouse = None;
            }
            self.mouse_left(id);
            self.lose_focus(id);
        }

        self.focus.retain(|f| !ids.contains(f));
        let new_top = self.focused();
        if new_top != old_top {
            if let Some(next) = new_top {
                self.gain_focus(next);
            }
        }
    }
}
