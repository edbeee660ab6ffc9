//! Render data contract: what an external renderer reads from a display
//! object.
//!
//! The core never rasterizes. It hands a renderer the object's screen area,
//! font, tint and cells, and expects the renderer to report back by letting
//! the host clear the dirty and force-refresh flags once it has consumed
//! them.

use crate::geometry::Rect;
use crate::scene::SceneObject;
use crate::surface::Tint;
use std::rc::Rc;

/// Pixel size of one cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CellSize {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl CellSize {
    /// Create a new cell size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// One pixel per cell: terminal backends, where "pixels" are cells.
    pub const UNIT: Self = Self::new(1, 1);
}

impl Default for CellSize {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Identity of a font plus its native cell size.
///
/// The glyph atlas behind the name belongs to the renderer.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontRef {
    name: Rc<str>,
    cell_size: CellSize,
}

impl FontRef {
    /// Create a font reference.
    pub fn new(name: &str, cell_size: CellSize) -> Self {
        Self {
            name: Rc::from(name),
            cell_size,
        }
    }

    /// Font name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native cell size of the font.
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }
}

impl Default for FontRef {
    /// A terminal font: one cell per "pixel".
    fn default() -> Self {
        Self::new("terminal", CellSize::UNIT)
    }
}

/// Read/write view a renderer needs on a display object.
pub trait RenderData {
    /// Screen-space area in pixels, derived from position, font size and view.
    fn absolute_area(&self) -> Rect;

    /// Font the cells index into.
    fn font(&self) -> &FontRef;

    /// Cell size in effect.
    fn font_size(&self) -> CellSize;

    /// Tint laid over the object.
    fn tint(&self) -> Tint;

    /// Whether cells changed since the last render.
    fn is_dirty(&self) -> bool;

    /// Set or clear the dirty flag.
    fn set_dirty(&mut self, dirty: bool);

    /// Whether the renderer must redraw even if nothing is dirty.
    fn force_renderer_refresh(&self) -> bool;

    /// Set or clear the force-refresh flag.
    fn set_force_renderer_refresh(&mut self, force: bool);
}

/// An external renderer driven by [`GameHost::draw`](crate::GameHost::draw).
///
/// Implementations read cells and render data but must not mutate cells.
pub trait Renderer {
    /// Draw one object. Called only for visible objects that are dirty or
    /// flagged for a forced refresh.
    fn render(&mut self, object: &SceneObject);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_is_terminal() {
        let font = FontRef::default();
        assert_eq!(font.name(), "terminal");
        assert_eq!(font.cell_size(), CellSize::UNIT);
    }

    #[test]
    fn test_font_equality_is_by_value() {
        let a = FontRef::new("ibm8x16", CellSize::new(8, 16));
        let b = FontRef::new("ibm8x16", CellSize::new(8, 16));
        assert_eq!(a, b);
        assert_ne!(a, FontRef::new("ibm8x16", CellSize::new(16, 32)));
    }
}
