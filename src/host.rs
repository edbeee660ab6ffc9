//! Host: The game-loop driver context.
//!
//! A [`GameHost`] owns everything the loop needs between frames: the
//! configuration, the scene, the mouse tracker and frame timing. The
//! application polls its own input backend and drives the host:
//!
//! ```rust
//! use glyphstage::{CellSurface, GameHost, HostConfig, RenderData, Renderer, SceneObject};
//! use std::time::Duration;
//!
//! struct Count(usize);
//! impl Renderer for Count {
//!     fn render(&mut self, _object: &SceneObject) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut host = GameHost::new(HostConfig::default());
//! let id = host.scene_mut().spawn(CellSurface::new(80, 25)?, None)?;
//! host.scene_mut().get_mut(id).unwrap().surface_mut().print(0, 0, "hello")?;
//!
//! host.update(Duration::from_millis(16));
//! let mut renderer = Count(0);
//! assert_eq!(host.draw(&mut renderer), 1);
//! assert!(!host.scene().get(id).unwrap().is_dirty());
//! # Ok::<(), glyphstage::SceneError>(())
//! ```

use crate::config::HostConfig;
use crate::input::{InputEvent, KeyCode, KeyEvent, MouseTracker};
use crate::render::{RenderData, Renderer};
use crate::scene::Scene;
use std::time::Duration;

/// Frame timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInfo {
    /// Frames updated so far.
    pub frame_number: u64,
    /// Time of the last update step.
    pub delta: Duration,
    /// Total time passed to `update`.
    pub elapsed: Duration,
}

/// Explicit context for one game loop.
#[derive(Debug)]
pub struct GameHost {
    config: HostConfig,
    scene: Scene,
    mouse: MouseTracker,
    frame: FrameInfo,
    screen_size: (u16, u16),
    window_focused: bool,
}

impl GameHost {
    /// Create a host with an empty scene.
    pub fn new(config: HostConfig) -> Self {
        Self {
            scene: Scene::new(config.clone()),
            config,
            mouse: MouseTracker::new(),
            frame: FrameInfo::default(),
            screen_size: (0, 0),
            window_focused: true,
        }
    }

    /// Configuration in effect.
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The scene.
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub const fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Frame timing so far.
    pub const fn frame(&self) -> FrameInfo {
        self.frame
    }

    /// Last display size reported by the backend, in cells.
    pub const fn screen_size(&self) -> (u16, u16) {
        self.screen_size
    }

    /// Whether the display window has input focus, as last reported.
    pub const fn has_window_focus(&self) -> bool {
        self.window_focused
    }

    /// Mouse state accumulated for the next frame.
    pub const fn mouse(&self) -> &MouseTracker {
        &self.mouse
    }

    /// Feed one backend event.
    ///
    /// Keys and pasted text are routed immediately; mouse events accumulate
    /// until the next [`update`](Self::update). Losing window focus drops
    /// held mouse buttons, since their release will never be reported.
    ///
    /// Returns `true` when the event was used: a key or paste consumed by a
    /// handler, a mouse event, a resize or a window focus change.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.scene.process_keyboard(key),
            InputEvent::Paste(text) => self.paste(text),
            InputEvent::Resize { width, height } => {
                log::debug!("display resized to {width}x{height}");
                self.screen_size = (*width, *height);
                true
            }
            InputEvent::FocusGained => {
                log::debug!("window focus gained");
                self.window_focused = true;
                true
            }
            InputEvent::FocusLost => {
                log::debug!("window focus lost");
                self.window_focused = false;
                self.mouse.release_buttons();
                true
            }
            other => self.mouse.apply(other),
        }
    }

    /// Type pasted text into the focused object, one key press per character.
    fn paste(&mut self, text: &str) -> bool {
        let mut consumed = false;
        for c in text.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\t' => KeyCode::Tab,
                c if c.is_control() => continue,
                c => KeyCode::Char(c),
            };
            consumed |= self.scene.process_keyboard(&KeyEvent::plain(code));
        }
        consumed
    }

    /// Advance one frame: resolve the mouse, then run update handlers of
    /// enabled objects in draw order.
    pub fn update(&mut self, delta: Duration) {
        self.frame.frame_number += 1;
        self.frame.delta = delta;
        self.frame.elapsed += delta;

        let mouse = self.mouse.frame();
        self.scene.process_mouse(&mouse);

        for id in self.scene.update_order() {
            if let Some(object) = self.scene.get_mut(id) {
                object.run_update(delta);
            }
        }
    }

    /// Hand every visible object that is dirty (or flagged for a forced
    /// refresh) to `renderer`, in draw order. Flags are cleared after the
    /// renderer returns. Returns the number of objects drawn.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut drawn = 0;
        for id in self.scene.draw_order() {
            let Some(object) = self.scene.get_mut(id) else {
                continue;
            };
            if !object.is_dirty() && !object.force_renderer_refresh() {
                continue;
            }
            renderer.render(object);
            object.set_dirty(false);
            object.set_force_renderer_refresh(false);
            drawn += 1;
        }
        log::trace!("frame {} drew {drawn} objects", self.frame.frame_number);
        drawn
    }
}

impl Default for GameHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::input::{KeyModifiers, MouseButton, MouseEvent, SceneEvent};
    use crate::scene::{ObjectId, SceneObject};
    use crate::surface::CellSurface;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        drawn: Vec<(ObjectId, bool)>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, object: &SceneObject) {
            self.drawn.push((object.id(), object.is_dirty()));
        }
    }

    fn host_with(count: usize) -> (GameHost, Vec<ObjectId>) {
        let mut host = GameHost::default();
        let ids = (0..count)
            .map(|_| host.scene_mut().spawn(CellSurface::new(4, 4).unwrap(), None).unwrap())
            .collect();
        (host, ids)
    }

    fn mouse_event(x: i32, y: i32) -> MouseEvent {
        MouseEvent {
            position: Point::new(x, y),
            button: Some(MouseButton::Left),
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_draw_only_dirty_then_clears() {
        let (mut host, ids) = host_with(2);
        let mut recorder = Recorder::default();

        assert_eq!(host.draw(&mut recorder), 2);
        assert_eq!(recorder.drawn, [(ids[0], true), (ids[1], true)]);

        recorder.drawn.clear();
        assert_eq!(host.draw(&mut recorder), 0);

        host.scene_mut().get_mut(ids[1]).unwrap().surface_mut().set_glyph(0, 0, 1).unwrap();
        assert_eq!(host.draw(&mut recorder), 1);
        assert_eq!(recorder.drawn, [(ids[1], true)]);
    }

    #[test]
    fn test_force_refresh_redraws_clean_object() {
        let (mut host, ids) = host_with(1);
        let mut recorder = Recorder::default();
        host.draw(&mut recorder);

        host.scene_mut().get_mut(ids[0]).unwrap().set_force_renderer_refresh(true);
        assert_eq!(host.draw(&mut recorder), 1);
        assert!(!host.scene().get(ids[0]).unwrap().force_renderer_refresh());
        assert_eq!(host.draw(&mut recorder), 0);
    }

    #[test]
    fn test_hidden_objects_are_not_drawn() {
        let (mut host, ids) = host_with(2);
        host.scene_mut().get_mut(ids[0]).unwrap().set_visible(false);
        let mut recorder = Recorder::default();
        assert_eq!(host.draw(&mut recorder), 1);
        assert!(host.scene().get(ids[0]).unwrap().is_dirty());
    }

    #[test]
    fn test_update_runs_handlers_and_counts_frames() {
        let (mut host, ids) = host_with(2);
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        host.scene_mut().get_mut(ids[0]).unwrap().on_update(move |_, delta| {
            counter.set(counter.get() + delta.as_millis());
        });
        host.scene_mut().get_mut(ids[1]).unwrap().on_update(|_, _| unreachable!());
        host.scene_mut().get_mut(ids[1]).unwrap().set_enabled(false);

        host.update(Duration::from_millis(16));
        host.update(Duration::from_millis(20));
        assert_eq!(ticks.get(), 36);
        assert_eq!(host.frame().frame_number, 2);
        assert_eq!(host.frame().elapsed, Duration::from_millis(36));
    }

    #[test]
    fn test_mouse_click_resolves_on_update() {
        let (mut host, ids) = host_with(1);
        let rx = host.scene_mut().subscribe();

        assert!(host.handle_input(&InputEvent::MouseDown(mouse_event(1, 1))));
        assert!(host.handle_input(&InputEvent::MouseUp(mouse_event(1, 1))));
        assert!(rx.try_recv().is_err());

        host.update(Duration::from_millis(16));
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, SceneEvent::MouseButtonClicked { button: MouseButton::Left, .. })));
        assert_eq!(events.last(), Some(&SceneEvent::Focused(ids[0])));
    }

    #[test]
    fn test_keys_route_to_focus_and_resize_is_recorded() {
        let (mut host, ids) = host_with(1);
        host.scene_mut().get_mut(ids[0]).unwrap().on_keyboard(|key| key.code == KeyCode::Char('x'));
        let key = InputEvent::Key(KeyEvent::plain(KeyCode::Char('x')));

        assert!(!host.handle_input(&key));
        host.scene_mut().set_focus(ids[0]).unwrap();
        assert!(host.handle_input(&key));

        assert!(host.handle_input(&InputEvent::Resize { width: 80, height: 25 }));
        assert_eq!(host.screen_size(), (80, 25));
    }

    #[test]
    fn test_window_focus_loss_drops_held_buttons() {
        let (mut host, _) = host_with(1);
        assert!(host.has_window_focus());
        host.handle_input(&InputEvent::MouseDown(mouse_event(1, 1)));

        assert!(host.handle_input(&InputEvent::FocusLost));
        assert!(!host.has_window_focus());
        assert!(host.mouse().state().buttons_down.is_empty());

        // The release arrives after focus comes back; it is not a click.
        assert!(host.handle_input(&InputEvent::FocusGained));
        assert!(host.has_window_focus());
        host.handle_input(&InputEvent::MouseUp(mouse_event(1, 1)));
        assert!(host.mouse().state().clicked.is_empty());
    }

    #[test]
    fn test_paste_types_into_focused_object() {
        let (mut host, ids) = host_with(1);
        let typed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&typed);
        host.scene_mut().get_mut(ids[0]).unwrap().on_keyboard(move |key| {
            sink.borrow_mut().push(key.code);
            true
        });

        let paste = InputEvent::Paste("ok\r\n".into());
        assert!(!host.handle_input(&paste));
        assert!(typed.borrow().is_empty());

        host.scene_mut().set_focus(ids[0]).unwrap();
        assert!(host.handle_input(&paste));
        assert_eq!(*typed.borrow(), [KeyCode::Char('o'), KeyCode::Char('k'), KeyCode::Enter]);
    }
}
