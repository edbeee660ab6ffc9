//! Cell surface: A grid of glyph cells with a movable view.
//!
//! Cells are stored contiguously in row-major order. The surface exposes a
//! buffer extent (everything allocated) and a view (the window a renderer
//! shows), and remembers whether anything changed since the last render.
//!
//! # Aliasing
//!
//! Storage sits behind an `Rc<RefCell<..>>` so that
//! [`CellSurface::set_surface`] can point one surface at a window of another
//! surface's cells. Writes through either surface are visible through both.
//! Each surface keeps its own dirty flag; the crate does not track who else
//! is looking at a shared buffer. While a [`CellMut`] from one alias is
//! alive, every other access to the shared cells fails with
//! [`SceneError::CellsBorrowed`].

use super::cell::{EffectHandle, GlyphCell, Mirror, Rgb};
use crate::error::{Result, SceneError};
use crate::geometry::{Point, Rect};
use std::cell::{Ref, RefCell, RefMut};
use std::ops::Deref;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

type CellStore = Rc<RefCell<Vec<GlyphCell>>>;

/// A fixed-size 2D array of glyph cells plus a view and a dirty flag.
pub struct CellSurface {
    /// Backing cells, possibly shared with another surface.
    store: CellStore,
    /// Row length of the backing store.
    stride: i32,
    /// Offset of this surface's (0, 0) inside the backing store.
    origin: Point,
    /// Buffer width in cells.
    width: i32,
    /// Buffer height in cells.
    height: i32,
    /// Visible window, always inside the buffer.
    view: Rect,
    dirty: bool,
    default_foreground: Rgb,
    default_background: Rgb,
    default_glyph: u32,
}

/// Mutable access to one cell of a surface.
///
/// Every setter marks the owning surface dirty. Reads go through `Deref`.
pub struct CellMut<'a> {
    cell: RefMut<'a, GlyphCell>,
    dirty: &'a mut bool,
}

impl CellMut<'_> {
    /// Set the glyph index.
    pub fn set_glyph(&mut self, glyph: u32) -> &mut Self {
        self.cell.set_glyph(glyph);
        *self.dirty = true;
        self
    }

    /// Set the foreground color.
    pub fn set_foreground(&mut self, foreground: Rgb) -> &mut Self {
        self.cell.set_foreground(foreground);
        *self.dirty = true;
        self
    }

    /// Set the background color.
    pub fn set_background(&mut self, background: Rgb) -> &mut Self {
        self.cell.set_background(background);
        *self.dirty = true;
        self
    }

    /// Set the mirror flags.
    pub fn set_mirror(&mut self, mirror: Mirror) -> &mut Self {
        self.cell.set_mirror(mirror);
        *self.dirty = true;
        self
    }

    /// Attach or detach an effect.
    pub fn set_effect(&mut self, effect: Option<EffectHandle>) -> &mut Self {
        self.cell.set_effect(effect);
        *self.dirty = true;
        self
    }

    /// Overwrite the whole cell.
    pub fn copy_from(&mut self, other: &GlyphCell) -> &mut Self {
        self.cell.copy_appearance_from(other);
        *self.dirty = true;
        self
    }
}

impl Deref for CellMut<'_> {
    type Target = GlyphCell;

    fn deref(&self) -> &GlyphCell {
        &self.cell
    }
}

fn read_cells(store: &CellStore) -> Result<Ref<'_, Vec<GlyphCell>>> {
    store.try_borrow().map_err(|_| SceneError::CellsBorrowed)
}

fn write_cells(store: &CellStore) -> Result<RefMut<'_, Vec<GlyphCell>>> {
    store.try_borrow_mut().map_err(|_| SceneError::CellsBorrowed)
}

fn check_dimensions(width: i32, height: i32, buffer_width: i32, buffer_height: i32) -> Result<()> {
    if width <= 0 || height <= 0 || buffer_width <= 0 || buffer_height <= 0 || width > buffer_width || height > buffer_height {
        return Err(SceneError::InvalidDimension {
            width,
            height,
            buffer_width,
            buffer_height,
        });
    }
    Ok(())
}

/// Keep the view's corner where it was, pulled back far enough to fit.
fn clamp_view(position: Point, width: i32, height: i32, buffer_width: i32, buffer_height: i32) -> Rect {
    Rect::new(
        position.x.clamp(0, buffer_width - width),
        position.y.clamp(0, buffer_height - height),
        width,
        height,
    )
}

impl CellSurface {
    /// Create a surface whose view covers the whole buffer.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::with_view(width, height, width, height)
    }

    /// Create a surface with a view smaller than (or equal to) its buffer.
    pub fn with_view(view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32) -> Result<Self> {
        check_dimensions(view_width, view_height, buffer_width, buffer_height)?;
        let blank = GlyphCell::new(Rgb::DEFAULT_FG, Rgb::DEFAULT_BG, 0);
        let size = (buffer_width as usize) * (buffer_height as usize);
        Ok(Self::from_parts(vec![blank; size], view_width, view_height, buffer_width, buffer_height))
    }

    /// Create a surface over an existing cell array.
    pub fn from_cells(
        cells: Vec<GlyphCell>,
        view_width: i32,
        view_height: i32,
        buffer_width: i32,
        buffer_height: i32,
    ) -> Result<Self> {
        check_dimensions(view_width, view_height, buffer_width, buffer_height)?;
        let expected = (buffer_width as usize) * (buffer_height as usize);
        if cells.len() != expected {
            return Err(SceneError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self::from_parts(cells, view_width, view_height, buffer_width, buffer_height))
    }

    fn from_parts(cells: Vec<GlyphCell>, view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32) -> Self {
        Self {
            store: Rc::new(RefCell::new(cells)),
            stride: buffer_width,
            origin: Point::ZERO,
            width: buffer_width,
            height: buffer_height,
            view: Rect::from_size(view_width, view_height),
            dirty: true,
            default_foreground: Rgb::DEFAULT_FG,
            default_background: Rgb::DEFAULT_BG,
            default_glyph: 0,
        }
    }

    /// Buffer width.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Buffer height.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The whole buffer as a rectangle at the origin.
    #[inline]
    pub const fn buffer_rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// The visible window into the buffer.
    #[inline]
    pub const fn view(&self) -> Rect {
        self.view
    }

    /// Visible width.
    #[inline]
    pub const fn view_width(&self) -> i32 {
        self.view.width
    }

    /// Visible height.
    #[inline]
    pub const fn view_height(&self) -> i32 {
        self.view.height
    }

    /// Whether the cells changed since the flag was last cleared.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the dirty flag.
    #[inline]
    pub const fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Foreground used when cells are cleared.
    pub const fn default_foreground(&self) -> Rgb {
        self.default_foreground
    }

    /// Background used when cells are cleared.
    pub const fn default_background(&self) -> Rgb {
        self.default_background
    }

    /// Glyph used when cells are cleared.
    pub const fn default_glyph(&self) -> u32 {
        self.default_glyph
    }

    /// Change the clear foreground.
    pub const fn set_default_foreground(&mut self, color: Rgb) {
        self.default_foreground = color;
        self.dirty = true;
    }

    /// Change the clear background.
    pub const fn set_default_background(&mut self, color: Rgb) {
        self.default_background = color;
        self.dirty = true;
    }

    /// Change the clear glyph.
    pub const fn set_default_glyph(&mut self, glyph: u32) {
        self.default_glyph = glyph;
        self.dirty = true;
    }

    /// Whether two surfaces read and write the same backing cells.
    pub fn shares_cells_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    fn blank_cell(&self) -> GlyphCell {
        GlyphCell::new(self.default_foreground, self.default_background, self.default_glyph)
    }

    /// Store index of a local coordinate that is known to be in range.
    #[inline]
    fn raw_index(&self, x: i32, y: i32) -> usize {
        ((self.origin.y + y) * self.stride + self.origin.x + x) as usize
    }

    /// Bounds-check against the buffer extent (not the view).
    fn index_of(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Err(SceneError::IndexOutOfRange {
                x,
                y,
                buffer_width: self.width,
                buffer_height: self.height,
            });
        }
        Ok(self.raw_index(x, y))
    }

    /// Copy of the cell at (x, y).
    pub fn cell(&self, x: i32, y: i32) -> Result<GlyphCell> {
        let index = self.index_of(x, y)?;
        Ok(read_cells(&self.store)?[index].clone())
    }

    /// Mutable access to the cell at (x, y).
    ///
    /// Fails with [`SceneError::CellsBorrowed`] while the shared cells are
    /// borrowed through an alias.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<CellMut<'_>> {
        let index = self.index_of(x, y)?;
        let cell = RefMut::map(write_cells(&self.store)?, |cells| &mut cells[index]);
        Ok(CellMut {
            cell,
            dirty: &mut self.dirty,
        })
    }

    /// Replace the cell at (x, y).
    pub fn set_cell(&mut self, x: i32, y: i32, cell: &GlyphCell) -> Result<()> {
        self.cell_mut(x, y)?.copy_from(cell);
        Ok(())
    }

    /// Set the glyph at (x, y).
    pub fn set_glyph(&mut self, x: i32, y: i32, glyph: u32) -> Result<()> {
        self.cell_mut(x, y)?.set_glyph(glyph);
        Ok(())
    }

    /// Set the foreground at (x, y).
    pub fn set_foreground(&mut self, x: i32, y: i32, color: Rgb) -> Result<()> {
        self.cell_mut(x, y)?.set_foreground(color);
        Ok(())
    }

    /// Set the background at (x, y).
    pub fn set_background(&mut self, x: i32, y: i32, color: Rgb) -> Result<()> {
        self.cell_mut(x, y)?.set_background(color);
        Ok(())
    }

    /// Set the mirror flags at (x, y).
    pub fn set_mirror(&mut self, x: i32, y: i32, mirror: Mirror) -> Result<()> {
        self.cell_mut(x, y)?.set_mirror(mirror);
        Ok(())
    }

    /// Attach or detach an effect at (x, y).
    pub fn set_effect(&mut self, x: i32, y: i32, effect: Option<EffectHandle>) -> Result<()> {
        self.cell_mut(x, y)?.set_effect(effect);
        Ok(())
    }

    /// Move the view inside the buffer.
    pub fn set_view(&mut self, view: Rect) -> Result<()> {
        if !self.buffer_rect().contains_rect(&view) {
            return Err(SceneError::OutOfBounds {
                view,
                buffer_width: self.width,
                buffer_height: self.height,
            });
        }
        if view != self.view {
            self.view = view;
            self.dirty = true;
        }
        Ok(())
    }

    /// Resize both the buffer and the view.
    ///
    /// Cells at coordinates that exist in both the old and new buffer keep
    /// their value unless `clear` is set; every other cell starts blank.
    /// An aliased surface gets fresh storage of its own.
    pub fn resize(&mut self, view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32, clear: bool) -> Result<()> {
        self.check_resize(view_width, view_height, buffer_width, buffer_height, clear)?;

        let blank = self.blank_cell();
        let mut cells = vec![blank; (buffer_width as usize) * (buffer_height as usize)];

        if !clear {
            let old = read_cells(&self.store)?;
            let copy_width = self.width.min(buffer_width);
            let copy_height = self.height.min(buffer_height);
            for y in 0..copy_height {
                for x in 0..copy_width {
                    cells[(y * buffer_width + x) as usize].clone_from(&old[self.raw_index(x, y)]);
                }
            }
        }

        log::debug!(
            "resize surface {}x{} -> {}x{} (view {}x{}, clear={})",
            self.width,
            self.height,
            buffer_width,
            buffer_height,
            view_width,
            view_height,
            clear
        );

        self.store = Rc::new(RefCell::new(cells));
        self.stride = buffer_width;
        self.origin = Point::ZERO;
        self.width = buffer_width;
        self.height = buffer_height;
        self.view = clamp_view(self.view.position(), view_width, view_height, buffer_width, buffer_height);
        self.dirty = true;
        Ok(())
    }

    /// Resize only the view, keeping the buffer as it is.
    pub fn resize_view(&mut self, width: i32, height: i32, clear: bool) -> Result<()> {
        self.check_resize_view(width, height, clear)?;
        if clear {
            self.clear()?;
        }
        self.view = clamp_view(self.view.position(), width, height, self.width, self.height);
        self.dirty = true;
        Ok(())
    }

    /// Fails the way [`CellSurface::resize`] would, without changing anything.
    pub(crate) fn check_resize(
        &self,
        view_width: i32,
        view_height: i32,
        buffer_width: i32,
        buffer_height: i32,
        clear: bool,
    ) -> Result<()> {
        check_dimensions(view_width, view_height, buffer_width, buffer_height)?;
        if !clear {
            read_cells(&self.store)?;
        }
        Ok(())
    }

    /// Fails the way [`CellSurface::resize_view`] would, without changing anything.
    pub(crate) fn check_resize_view(&self, width: i32, height: i32, clear: bool) -> Result<()> {
        check_dimensions(width, height, self.width, self.height)?;
        if clear {
            write_cells(&self.store)?;
        }
        Ok(())
    }

    /// Point this surface at a window of another surface's cells.
    ///
    /// `view` is in the source's buffer coordinates. Afterwards this surface's
    /// buffer is exactly that window and its view covers all of it.
    pub fn set_surface(&mut self, source: &Self, view: Rect) -> Result<()> {
        if !source.buffer_rect().contains_rect(&view) {
            return Err(SceneError::OutOfBounds {
                view,
                buffer_width: source.width,
                buffer_height: source.height,
            });
        }

        log::debug!("remap surface onto {view:?} of a {}x{} buffer", source.width, source.height);

        self.store = Rc::clone(&source.store);
        self.stride = source.stride;
        self.origin = source.origin + view.position();
        self.width = view.width;
        self.height = view.height;
        self.view = Rect::from_size(view.width, view.height);
        self.dirty = true;
        Ok(())
    }

    /// Replace the backing cells wholesale.
    pub fn set_surface_cells(
        &mut self,
        cells: Vec<GlyphCell>,
        view_width: i32,
        view_height: i32,
        buffer_width: i32,
        buffer_height: i32,
    ) -> Result<()> {
        check_dimensions(view_width, view_height, buffer_width, buffer_height)?;
        let expected = (buffer_width as usize) * (buffer_height as usize);
        if cells.len() != expected {
            return Err(SceneError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }

        self.store = Rc::new(RefCell::new(cells));
        self.stride = buffer_width;
        self.origin = Point::ZERO;
        self.width = buffer_width;
        self.height = buffer_height;
        self.view = clamp_view(self.view.position(), view_width, view_height, buffer_width, buffer_height);
        self.dirty = true;
        Ok(())
    }

    /// Reset every cell to the surface defaults.
    pub fn clear(&mut self) -> Result<()> {
        let blank = self.blank_cell();
        self.fill_rect(self.buffer_rect(), &blank)
    }

    /// Fill every cell with a copy of `cell`.
    pub fn fill(&mut self, cell: &GlyphCell) -> Result<()> {
        self.fill_rect(self.buffer_rect(), cell)
    }

    /// Fill a rectangle (clipped to the buffer) with a copy of `cell`.
    pub fn fill_rect(&mut self, area: Rect, cell: &GlyphCell) -> Result<()> {
        let x0 = area.x.max(0);
        let y0 = area.y.max(0);
        let x1 = area.right().min(self.width);
        let y1 = area.bottom().min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let mut cells = write_cells(&self.store)?;
        for y in y0..y1 {
            for x in x0..x1 {
                cells[self.raw_index(x, y)].clone_from(cell);
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Write text starting at (x, y), one grapheme per cell.
    ///
    /// Only glyphs change; colors stay as they are. Text wraps onto the next
    /// row and stops at the end of the buffer. Zero-width clusters are
    /// skipped. Returns the number of cells written.
    pub fn print(&mut self, x: i32, y: i32, text: &str) -> Result<usize> {
        self.index_of(x, y)?;

        let mut cells = write_cells(&self.store)?;
        let mut cursor = y * self.width + x;
        let end = self.width * self.height;
        let mut written = 0;

        for grapheme in text.graphemes(true) {
            if cursor >= end {
                break;
            }
            if unicode_width::UnicodeWidthStr::width(grapheme) == 0 {
                continue;
            }
            let Some(c) = grapheme.chars().next() else {
                continue;
            };
            let index = self.raw_index(cursor % self.width, cursor / self.width);
            cells[index].set_glyph(c as u32);
            cursor += 1;
            written += 1;
        }

        if written > 0 {
            self.dirty = true;
        }
        Ok(written)
    }

    /// Copy of the whole buffer in row-major order.
    pub fn cells(&self) -> Result<Vec<GlyphCell>> {
        let store = read_cells(&self.store)?;
        Ok((0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| store[self.raw_index(x, y)].clone())
            .collect())
    }

    /// Visit every cell inside the view, row by row.
    ///
    /// The point passed to `f` is relative to the view's top-left corner.
    /// This is the read path renderers use; it never touches the dirty flag.
    pub fn for_each_view_cell(&self, mut f: impl FnMut(Point, &GlyphCell)) -> Result<()> {
        let store = read_cells(&self.store)?;
        for y in 0..self.view.height {
            for x in 0..self.view.width {
                let cell = &store[self.raw_index(self.view.x + x, self.view.y + y)];
                f(Point::new(x, y), cell);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for CellSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("view", &self.view)
            .field("dirty", &self.dirty)
            .field("aliased", &(Rc::strong_count(&self.store) > 1))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_at(surface: &CellSurface, x: i32, y: i32) -> u32 {
        surface.cell(x, y).unwrap().glyph()
    }

    #[test]
    fn test_new_surface() {
        let surface = CellSurface::new(80, 25).unwrap();
        assert_eq!(surface.width(), 80);
        assert_eq!(surface.height(), 25);
        assert_eq!(surface.view(), Rect::from_size(80, 25));
        assert_eq!(surface.cells().unwrap().len(), 80 * 25);
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(CellSurface::new(0, 5), Err(SceneError::InvalidDimension { .. })));
        assert!(matches!(CellSurface::new(5, -1), Err(SceneError::InvalidDimension { .. })));
        assert!(matches!(CellSurface::with_view(11, 5, 10, 5), Err(SceneError::InvalidDimension { .. })));
    }

    #[test]
    fn test_from_cells_size_mismatch() {
        let cells = vec![GlyphCell::default(); 99];
        let err = CellSurface::from_cells(cells, 10, 10, 10, 10).unwrap_err();
        assert_eq!(err, SceneError::SizeMismatch { expected: 100, actual: 99 });
    }

    #[test]
    fn test_cell_access_is_checked_against_buffer() {
        let mut surface = CellSurface::with_view(5, 5, 10, 10).unwrap();
        // Outside the view but inside the buffer is fine.
        assert!(surface.set_glyph(9, 9, 1).is_ok());
        assert!(matches!(surface.cell(10, 0), Err(SceneError::IndexOutOfRange { .. })));
        assert!(matches!(surface.cell(0, -1), Err(SceneError::IndexOutOfRange { .. })));
        assert!(matches!(surface.set_glyph(0, 10, 1), Err(SceneError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_every_setter_marks_dirty() {
        let mut surface = CellSurface::new(4, 4).unwrap();

        surface.set_dirty(false);
        surface.set_glyph(1, 1, 7).unwrap();
        assert!(surface.is_dirty());

        surface.set_dirty(false);
        surface.set_foreground(1, 1, Rgb::new(1, 2, 3)).unwrap();
        assert!(surface.is_dirty());

        surface.set_dirty(false);
        surface.set_background(1, 1, Rgb::new(3, 2, 1)).unwrap();
        assert!(surface.is_dirty());

        surface.set_dirty(false);
        surface.set_mirror(1, 1, Mirror::VERTICAL).unwrap();
        assert!(surface.is_dirty());

        surface.set_dirty(false);
        surface.set_effect(1, 1, None).unwrap();
        assert!(surface.is_dirty());
    }

    #[test]
    fn test_reading_does_not_mark_dirty() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        surface.set_dirty(false);
        let _ = surface.cell(0, 0).unwrap();
        let guard = surface.cell_mut(0, 0).unwrap();
        assert_eq!(guard.glyph(), 0);
        drop(guard);
        surface.for_each_view_cell(|_, _| {}).unwrap();
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_dirty_resize_scenario() {
        let mut surface = CellSurface::new(10, 10).unwrap();
        surface.set_glyph(5, 5, 42).unwrap();
        assert!(surface.is_dirty());

        surface.set_dirty(false);
        surface.resize(10, 10, 20, 20, false).unwrap();

        assert!(surface.is_dirty());
        assert_eq!(glyph_at(&surface, 5, 5), 42);
        assert_eq!(surface.width(), 20);
        assert_eq!(surface.cells().unwrap().len(), 400);
    }

    #[test]
    fn test_resize_preserves_overlap_and_blanks_new_cells() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                surface.set_glyph(x, y, (y * 4 + x + 1) as u32).unwrap();
            }
        }

        surface.resize(3, 3, 3, 6, false).unwrap();
        for y in 0..6 {
            for x in 0..3 {
                let expected = if y < 4 { (y * 4 + x + 1) as u32 } else { 0 };
                assert_eq!(glyph_at(&surface, x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_resize_with_clear() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        surface.set_default_glyph(b'.' as u32);
        surface.set_glyph(1, 1, 9).unwrap();

        surface.resize(4, 4, 8, 8, true).unwrap();
        assert!(surface.cells().unwrap().iter().all(|c| c.glyph() == u32::from(b'.')));
    }

    #[test]
    fn test_resize_rejects_view_larger_than_buffer() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        let err = surface.resize(9, 4, 8, 8, false).unwrap_err();
        assert!(matches!(err, SceneError::InvalidDimension { width: 9, .. }));
        assert_eq!(surface.width(), 4);
    }

    #[test]
    fn test_resize_view_keeps_buffer() {
        let mut surface = CellSurface::with_view(10, 10, 20, 20).unwrap();
        surface.set_glyph(15, 15, 3).unwrap();
        surface.set_dirty(false);

        surface.resize_view(5, 5, false).unwrap();
        assert_eq!(surface.view(), Rect::from_size(5, 5));
        assert_eq!(surface.width(), 20);
        assert_eq!(glyph_at(&surface, 15, 15), 3);
        assert!(surface.is_dirty());

        assert!(matches!(surface.resize_view(21, 5, false), Err(SceneError::InvalidDimension { .. })));

        surface.resize_view(5, 5, true).unwrap();
        assert_eq!(glyph_at(&surface, 15, 15), 0);
    }

    #[test]
    fn test_resize_view_pulls_view_back_inside() {
        let mut surface = CellSurface::with_view(5, 5, 20, 20).unwrap();
        surface.set_view(Rect::new(15, 15, 5, 5)).unwrap();
        surface.resize_view(10, 10, false).unwrap();
        assert_eq!(surface.view(), Rect::new(10, 10, 10, 10));
    }

    #[test]
    fn test_set_view_out_of_bounds() {
        let mut surface = CellSurface::with_view(5, 5, 10, 10).unwrap();
        assert!(surface.set_view(Rect::new(5, 5, 5, 5)).is_ok());
        assert!(matches!(surface.set_view(Rect::new(6, 5, 5, 5)), Err(SceneError::OutOfBounds { .. })));
    }

    #[test]
    fn test_set_surface_aliases_window() {
        let mut source = CellSurface::new(10, 10).unwrap();
        source.set_glyph(3, 4, 77).unwrap();

        let mut alias = CellSurface::new(1, 1).unwrap();
        alias.set_surface(&source, Rect::new(2, 3, 4, 4)).unwrap();

        assert!(alias.shares_cells_with(&source));
        assert_eq!(alias.width(), 4);
        assert_eq!(alias.view(), Rect::from_size(4, 4));
        assert_eq!(glyph_at(&alias, 1, 1), 77);

        // Writes through the alias land in the source.
        alias.set_glyph(0, 0, 5).unwrap();
        assert_eq!(glyph_at(&source, 2, 3), 5);

        // The alias buffer is only the window.
        assert!(alias.cell(4, 0).is_err());
    }

    #[test]
    fn test_set_surface_rejects_view_outside_source() {
        let source = CellSurface::new(10, 10).unwrap();
        let mut alias = CellSurface::new(1, 1).unwrap();
        let err = alias.set_surface(&source, Rect::new(8, 8, 4, 4)).unwrap_err();
        assert!(matches!(err, SceneError::OutOfBounds { .. }));
        assert!(!alias.shares_cells_with(&source));
    }

    #[test]
    fn test_resize_detaches_alias() {
        let mut source = CellSurface::new(10, 10).unwrap();
        source.set_glyph(2, 2, 8).unwrap();
        let mut alias = CellSurface::new(1, 1).unwrap();
        alias.set_surface(&source, Rect::new(2, 2, 3, 3)).unwrap();

        alias.resize(3, 3, 5, 5, false).unwrap();
        assert!(!alias.shares_cells_with(&source));
        assert_eq!(glyph_at(&alias, 0, 0), 8);

        alias.set_glyph(0, 0, 1).unwrap();
        assert_eq!(glyph_at(&source, 2, 2), 8);
    }

    #[test]
    fn test_live_guard_on_alias_fails_other_access() {
        let mut source = CellSurface::new(10, 10).unwrap();
        let mut alias = CellSurface::new(1, 1).unwrap();
        alias.set_surface(&source, Rect::new(0, 0, 2, 2)).unwrap();

        let mut guard = alias.cell_mut(0, 0).unwrap();
        guard.set_glyph(4);
        assert_eq!(source.cell(3, 3), Err(SceneError::CellsBorrowed));
        assert_eq!(source.set_glyph(3, 3, 1), Err(SceneError::CellsBorrowed));
        assert_eq!(source.print(0, 0, "hi"), Err(SceneError::CellsBorrowed));
        assert_eq!(source.fill(&GlyphCell::from_char('x')), Err(SceneError::CellsBorrowed));
        assert_eq!(source.resize_view(5, 5, true), Err(SceneError::CellsBorrowed));
        assert!(source.cells().is_err());
        assert!(source.for_each_view_cell(|_, _| {}).is_err());
        assert_eq!(source.view(), Rect::from_size(10, 10));
        drop(guard);

        assert_eq!(glyph_at(&source, 0, 0), 4);
        source.set_glyph(3, 3, 1).unwrap();
        assert_eq!(glyph_at(&source, 3, 3), 1);
    }

    #[test]
    fn test_set_surface_cells() {
        let mut surface = CellSurface::new(2, 2).unwrap();
        let cells = vec![GlyphCell::from_char('z'); 12];

        assert_eq!(
            surface.set_surface_cells(cells.clone(), 3, 4, 4, 4).unwrap_err(),
            SceneError::SizeMismatch { expected: 16, actual: 12 }
        );

        surface.set_dirty(false);
        surface.set_surface_cells(cells, 3, 3, 4, 3).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.cell(3, 2).unwrap().glyph_char(), Some('z'));
        assert!(surface.is_dirty());
    }

    #[test]
    fn test_print_wraps_and_skips_zero_width() {
        let mut surface = CellSurface::new(4, 2).unwrap();
        let written = surface.print(2, 0, "abe\u{301}cdef").unwrap();

        // "e\u{301}" is one cluster; the buffer ends after 6 cells.
        assert_eq!(written, 6);
        let row: String = surface
            .cells()
            .unwrap()
            .iter()
            .map(|c| c.glyph_char().unwrap_or('?'))
            .collect();
        assert_eq!(row, "\0\0abecde");
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = CellSurface::new(4, 4).unwrap();
        surface.fill_rect(Rect::new(2, 2, 10, 10), &GlyphCell::from_char('#')).unwrap();
        assert_eq!(surface.cell(3, 3).unwrap().glyph_char(), Some('#'));
        assert_eq!(surface.cell(1, 3).unwrap().glyph(), 0);
    }

    #[test]
    fn test_for_each_view_cell_is_view_relative() {
        let mut surface = CellSurface::with_view(2, 2, 4, 4).unwrap();
        surface.set_glyph(3, 3, 9).unwrap();
        surface.set_view(Rect::new(2, 2, 2, 2)).unwrap();

        let mut seen = Vec::new();
        surface.for_each_view_cell(|p, c| seen.push((p, c.glyph()))).unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], (Point::new(1, 1), 9));
    }
}
