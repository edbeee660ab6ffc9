//! Surface capability traits.
//!
//! Rather than one monolithic surface type, capabilities are split so that a
//! type implements only what it supports: [`Surface`] for reading cells and
//! the dirty flag, [`SurfaceResize`] for resizing, and [`SurfaceSettable`] for
//! swapping the backing cells out.

use super::{CellSurface, GlyphCell};
use crate::error::Result;
use crate::geometry::Rect;

/// Read access to a grid of cells plus its dirty flag.
pub trait Surface {
    /// Buffer width.
    fn buffer_width(&self) -> i32;

    /// Buffer height.
    fn buffer_height(&self) -> i32;

    /// The visible window into the buffer.
    fn view(&self) -> Rect;

    /// Copy of the cell at (x, y), checked against the buffer extent.
    fn cell(&self, x: i32, y: i32) -> Result<GlyphCell>;

    /// Whether anything changed since the flag was cleared.
    fn is_dirty(&self) -> bool;

    /// Set or clear the dirty flag.
    fn set_dirty(&mut self, dirty: bool);
}

/// Surfaces that can change size.
pub trait SurfaceResize {
    /// Resize both buffer and view. `clear` resets every retained cell.
    fn resize(&mut self, view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32, clear: bool) -> Result<()>;

    /// Resize the view only, keeping the buffer.
    fn resize_view(&mut self, width: i32, height: i32, clear: bool) -> Result<()>;
}

/// Surfaces whose backing cells can be replaced.
pub trait SurfaceSettable {
    /// Alias a window of another surface's cells.
    fn set_surface(&mut self, source: &CellSurface, view: Rect) -> Result<()>;

    /// Replace the backing array wholesale.
    fn set_surface_cells(
        &mut self,
        cells: Vec<GlyphCell>,
        view_width: i32,
        view_height: i32,
        buffer_width: i32,
        buffer_height: i32,
    ) -> Result<()>;
}

impl Surface for CellSurface {
    fn buffer_width(&self) -> i32 {
        self.width()
    }

    fn buffer_height(&self) -> i32 {
        self.height()
    }

    fn view(&self) -> Rect {
        Self::view(self)
    }

    fn cell(&self, x: i32, y: i32) -> Result<GlyphCell> {
        Self::cell(self, x, y)
    }

    fn is_dirty(&self) -> bool {
        Self::is_dirty(self)
    }

    fn set_dirty(&mut self, dirty: bool) {
        Self::set_dirty(self, dirty);
    }
}

impl SurfaceResize for CellSurface {
    fn resize(&mut self, view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32, clear: bool) -> Result<()> {
        Self::resize(self, view_width, view_height, buffer_width, buffer_height, clear)
    }

    fn resize_view(&mut self, width: i32, height: i32, clear: bool) -> Result<()> {
        Self::resize_view(self, width, height, clear)
    }
}

impl SurfaceSettable for CellSurface {
    fn set_surface(&mut self, source: &CellSurface, view: Rect) -> Result<()> {
        Self::set_surface(self, source, view)
    }

    fn set_surface_cells(
        &mut self,
        cells: Vec<GlyphCell>,
        view_width: i32,
        view_height: i32,
        buffer_width: i32,
        buffer_height: i32,
    ) -> Result<()> {
        Self::set_surface_cells(self, cells, view_width, view_height, buffer_width, buffer_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shrink<S: SurfaceResize + Surface>(surface: &mut S) -> Result<()> {
        surface.set_dirty(false);
        surface.resize_view(2, 2, false)
    }

    #[test]
    fn test_generic_capabilities() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        shrink(&mut surface).unwrap();
        assert!(Surface::is_dirty(&surface));
        assert_eq!(Surface::view(&surface), Rect::from_size(2, 2));
        assert_eq!(surface.buffer_width(), 4);
    }
}
