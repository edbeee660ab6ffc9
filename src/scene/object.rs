//! Scene object: A positionable, orderable display object.
//!
//! A [`SceneObject`] owns a [`CellSurface`] (and optionally a [`LayerSet`]),
//! knows where it sits on screen, and carries the flags the input router
//! consults. Geometry that depends on the parent chain (position, font,
//! parent) is changed through [`Scene`](super::Scene) so that absolute
//! positions stay consistent across the subtree.

use super::order::SortOrdered;
use crate::config::HostConfig;
use crate::geometry::{Point, Rect};
use crate::input::{KeyEvent, MouseEventArgs, MouseState, ObjectMouseState};
use crate::overridable::OverridableDefault;
use crate::render::{CellSize, FontRef, RenderData};
use crate::surface::{CellSurface, LayerSet, Tint};
use std::fmt;
use std::time::Duration;

/// Unique identifier of an object within a scene.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an object takes focus when clicked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum FocusBehavior {
    /// Replace the currently focused object.
    #[default]
    Set,
    /// Push onto the focus stack; popping restores the previous object.
    Push,
}

/// Mouse handler. Set `handled` to stop propagation.
pub type MouseHandler = Box<dyn FnMut(&mut MouseEventArgs)>;

/// Keyboard handler. Returns `true` when the key was consumed.
pub type KeyboardHandler = Box<dyn FnMut(&KeyEvent) -> bool>;

/// Per-frame update handler.
pub type UpdateHandler = Box<dyn FnMut(&mut CellSurface, Duration)>;

/// A display object in a [`Scene`](super::Scene).
pub struct SceneObject {
    pub(crate) id: ObjectId,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,

    pub(crate) position: Point,
    pub(crate) absolute_position: Point,
    pub(crate) ignore_parent_position: bool,
    pub(crate) use_pixel_positioning: bool,

    sort_order: u32,
    visible: bool,
    enabled: bool,

    surface: CellSurface,
    layers: Option<LayerSet>,

    pub(crate) font: FontRef,
    pub(crate) font_size: OverridableDefault<CellSize>,
    tint: Tint,
    force_refresh: bool,

    use_mouse: bool,
    use_keyboard: bool,
    focus_on_click: bool,
    focus_mode: FocusBehavior,
    exclusive_mouse: bool,

    pub(crate) mouse_over: bool,
    pub(crate) focused: bool,
    pub(crate) last_mouse_position: Option<Point>,

    pub(crate) mouse_handlers: Vec<MouseHandler>,
    pub(crate) keyboard_handlers: Vec<KeyboardHandler>,
    pub(crate) update_handlers: Vec<UpdateHandler>,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, surface: CellSurface, config: &HostConfig) -> Self {
        let font = config.default_font.clone();
        Self {
            id,
            parent: None,
            children: Vec::new(),
            position: Point::ZERO,
            absolute_position: Point::ZERO,
            ignore_parent_position: false,
            use_pixel_positioning: false,
            sort_order: 0,
            visible: true,
            enabled: true,
            surface,
            layers: None,
            font_size: OverridableDefault::new(font.cell_size()),
            font,
            tint: Tint::NONE,
            force_refresh: false,
            use_mouse: config.use_mouse,
            use_keyboard: config.use_keyboard,
            focus_on_click: config.focus_on_click,
            focus_mode: FocusBehavior::Set,
            exclusive_mouse: false,
            mouse_over: false,
            focused: false,
            last_mouse_position: None,
            mouse_handlers: Vec::new(),
            keyboard_handlers: Vec::new(),
            update_handlers: Vec::new(),
        }
    }

    /// This object's id.
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Containing object, if any.
    pub const fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Children in insertion (or last sorted) order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Position relative to the parent, in cells (or pixels with pixel
    /// positioning).
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Screen position in pixels.
    pub const fn absolute_position(&self) -> Point {
        self.absolute_position
    }

    /// Whether the parent's position is ignored.
    pub const fn ignores_parent_position(&self) -> bool {
        self.ignore_parent_position
    }

    /// Whether `position` is in pixels rather than cells.
    pub const fn uses_pixel_positioning(&self) -> bool {
        self.use_pixel_positioning
    }

    /// Whether the font size is explicitly overridden.
    pub const fn is_font_size_overridden(&self) -> bool {
        self.font_size.is_overridden()
    }

    /// Whether the object is drawn and hit-tested.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the object and its children.
    pub const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the object (and its children) receive updates and input.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the object.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Change the draw/hit-test order among siblings.
    pub const fn set_sort_order(&mut self, sort_order: u32) {
        self.sort_order = sort_order;
    }

    /// The object's cells.
    pub const fn surface(&self) -> &CellSurface {
        &self.surface
    }

    /// Mutable access to the object's cells.
    pub const fn surface_mut(&mut self) -> &mut CellSurface {
        &mut self.surface
    }

    /// Extra layers drawn over the object's own surface, if any.
    pub const fn layers(&self) -> Option<&LayerSet> {
        self.layers.as_ref()
    }

    /// Mutable access to the layers, if any.
    pub const fn layers_mut(&mut self) -> Option<&mut LayerSet> {
        self.layers.as_mut()
    }

    /// The layer set, created empty on first use.
    pub fn layers_or_default(&mut self) -> &mut LayerSet {
        self.layers.get_or_insert_with(LayerSet::new)
    }

    /// Set the tint.
    pub const fn set_tint(&mut self, tint: Tint) {
        self.tint = tint;
    }

    /// Whether the object takes part in mouse hit-testing.
    pub const fn use_mouse(&self) -> bool {
        self.use_mouse
    }

    /// Opt in or out of mouse hit-testing.
    pub const fn set_use_mouse(&mut self, use_mouse: bool) {
        self.use_mouse = use_mouse;
    }

    /// Whether the object accepts keyboard input.
    pub const fn use_keyboard(&self) -> bool {
        self.use_keyboard
    }

    /// Opt in or out of keyboard input.
    pub const fn set_use_keyboard(&mut self, use_keyboard: bool) {
        self.use_keyboard = use_keyboard;
    }

    /// Whether a left click focuses the object.
    pub const fn focus_on_click(&self) -> bool {
        self.focus_on_click
    }

    /// Change the focus-on-click policy.
    pub const fn set_focus_on_click(&mut self, focus_on_click: bool) {
        self.focus_on_click = focus_on_click;
    }

    /// How the object takes focus.
    pub const fn focus_mode(&self) -> FocusBehavior {
        self.focus_mode
    }

    /// Change how the object takes focus.
    pub const fn set_focus_mode(&mut self, mode: FocusBehavior) {
        self.focus_mode = mode;
    }

    /// Whether the object captures the mouse exclusively.
    pub const fn is_exclusive_mouse(&self) -> bool {
        self.exclusive_mouse
    }

    /// Capture or release the mouse.
    ///
    /// While set, and while the object is visible and enabled, mouse
    /// resolution goes to this object wherever the pointer is. The current
    /// mouse target and the focused object take precedence over other
    /// exclusive objects. [`Scene::release_mouse`](crate::Scene::release_mouse)
    /// clears the flag on the holder.
    pub const fn set_exclusive_mouse(&mut self, exclusive: bool) {
        self.exclusive_mouse = exclusive;
    }

    /// Whether the pointer's last resolved target is this object.
    pub const fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    /// Whether the object has focus.
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Register a mouse handler. Handlers run in registration order, before
    /// the built-in enter/move/click behavior.
    pub fn on_mouse(&mut self, handler: impl FnMut(&mut MouseEventArgs) + 'static) {
        self.mouse_handlers.push(Box::new(handler));
    }

    /// Register a keyboard handler.
    pub fn on_keyboard(&mut self, handler: impl FnMut(&KeyEvent) -> bool + 'static) {
        self.keyboard_handlers.push(Box::new(handler));
    }

    /// Register a per-frame update handler.
    pub fn on_update(&mut self, handler: impl FnMut(&mut CellSurface, Duration) + 'static) {
        self.update_handlers.push(Box::new(handler));
    }

    /// Run update handlers against this object's surface.
    pub(crate) fn run_update(&mut self, delta: Duration) {
        for handler in &mut self.update_handlers {
            handler(&mut self.surface, delta);
        }
    }

    /// Pixel size one cell-unit of `position` stands for.
    pub(crate) fn position_scale(&self) -> (i32, i32) {
        if self.use_pixel_positioning {
            (1, 1)
        } else {
            let size = self.font_size.value();
            (i32::from(size.width), i32::from(size.height))
        }
    }

    /// Resolve the frame's mouse state against this object.
    pub(crate) fn mouse_state(&self, mouse: &MouseState) -> ObjectMouseState {
        let area = self.absolute_area();
        let size = self.font_size.value();
        let pixel = mouse.position - area.position();
        let cell = Point::new(
            pixel.x.div_euclid(i32::from(size.width.max(1))),
            pixel.y.div_euclid(i32::from(size.height.max(1))),
        );
        ObjectMouseState {
            object: self.id,
            pixel_position: pixel,
            cell_position: cell,
            is_on_object: area.contains(mouse.position),
            mouse: *mouse,
        }
    }
}

impl SortOrdered for SceneObject {
    fn sort_order(&self) -> u32 {
        self.sort_order
    }
}

impl RenderData for SceneObject {
    fn absolute_area(&self) -> Rect {
        let size = self.font_size.value();
        let view = self.surface.view();
        Rect::new(
            self.absolute_position.x,
            self.absolute_position.y,
            view.width * i32::from(size.width),
            view.height * i32::from(size.height),
        )
    }

    fn font(&self) -> &FontRef {
        &self.font
    }

    fn font_size(&self) -> CellSize {
        *self.font_size.value()
    }

    fn tint(&self) -> Tint {
        self.tint
    }

    fn is_dirty(&self) -> bool {
        self.surface.is_dirty() || self.layers.as_ref().is_some_and(LayerSet::is_dirty)
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.surface.set_dirty(dirty);
        if !dirty {
            if let Some(layers) = &mut self.layers {
                layers.clear_dirty();
            }
        }
    }

    fn force_renderer_refresh(&self) -> bool {
        self.force_refresh
    }

    fn set_force_renderer_refresh(&mut self, force: bool) {
        self.force_refresh = force;
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("position", &self.position)
            .field("absolute_position", &self.absolute_position)
            .field("sort_order", &self.sort_order)
            .field("visible", &self.visible)
            .field("surface", &self.surface)
            .field("layers", &self.layers.as_ref().map(LayerSet::len))
            .field("font", &self.font.name())
            .field("mouse_over", &self.mouse_over)
            .field("focused", &self.focused)
            .field("exclusive_mouse", &self.exclusive_mouse)
            .field("mouse_handlers", &self.mouse_handlers.len())
            .field("keyboard_handlers", &self.keyboard_handlers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(width: i32, height: i32) -> SceneObject {
        SceneObject::new(ObjectId(1), CellSurface::new(width, height).unwrap(), &HostConfig::default())
    }

    #[test]
    fn test_absolute_area_scales_view_by_font_size() {
        let mut obj = object(10, 4);
        obj.font_size.set(CellSize::new(8, 16));
        obj.absolute_position = Point::new(16, 32);
        assert_eq!(obj.absolute_area(), Rect::new(16, 32, 80, 64));

        obj.surface_mut().resize_view(5, 2, false).unwrap();
        assert_eq!(obj.absolute_area(), Rect::new(16, 32, 40, 32));
    }

    #[test]
    fn test_dirty_covers_layers() {
        let mut obj = object(4, 4);
        obj.layers_or_default().add("overlay", 4, 4, None).unwrap();
        assert!(obj.is_dirty());

        obj.set_dirty(false);
        assert!(!obj.is_dirty());
        assert!(!obj.layers().unwrap().is_dirty());

        obj.layers_mut().unwrap().get_mut("overlay").unwrap().surface_mut().set_glyph(1, 1, 2).unwrap();
        assert!(obj.is_dirty());
        assert!(!obj.surface().is_dirty());
    }

    #[test]
    fn test_mouse_state_resolves_cell() {
        let mut obj = object(10, 10);
        obj.font_size.set(CellSize::new(8, 8));
        obj.absolute_position = Point::new(80, 0);

        let state = obj.mouse_state(&MouseState::at(Point::new(97, 9)));
        assert!(state.is_on_object);
        assert_eq!(state.pixel_position, Point::new(17, 9));
        assert_eq!(state.cell_position, Point::new(2, 1));

        let outside = obj.mouse_state(&MouseState::at(Point::new(79, 9)));
        assert!(!outside.is_on_object);
        assert_eq!(outside.cell_position, Point::new(-1, 1));
    }

    #[test]
    fn test_update_handlers_edit_surface() {
        let mut obj = object(4, 4);
        obj.on_update(|surface, _| {
            surface.set_glyph(0, 0, 65).unwrap();
        });
        obj.surface_mut().set_dirty(false);
        obj.run_update(Duration::from_millis(16));
        assert_eq!(obj.surface().cell(0, 0).unwrap().glyph(), 65);
        assert!(obj.is_dirty());
    }
}
