//! Layer set: Named surfaces stacked into one logical surface.
//!
//! Layers are kept in render order, back to front. Hiding a layer keeps it
//! in place; it just contributes nothing when composed.

use super::cell_surface::CellSurface;
use super::cell::GlyphCell;
use super::traits::SurfaceResize;
use crate::error::{Result, SceneError};

/// One named surface inside a [`LayerSet`].
#[derive(Debug)]
pub struct Layer {
    name: String,
    visible: bool,
    surface: CellSurface,
}

impl Layer {
    /// Name, unique within its set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the layer is drawn.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the layer.
    ///
    /// A change marks the layer's surface dirty so the composite redraws.
    pub const fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.surface.set_dirty(true);
        }
    }

    /// The layer's cells.
    pub const fn surface(&self) -> &CellSurface {
        &self.surface
    }

    /// Mutable access to the layer's cells.
    pub const fn surface_mut(&mut self) -> &mut CellSurface {
        &mut self.surface
    }
}

/// An ordered collection of named layers.
#[derive(Debug, Default)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if the set has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    fn build(&self, name: String, width: i32, height: i32, cells: Option<Vec<GlyphCell>>) -> Result<Layer> {
        if self.position(&name).is_some() {
            return Err(SceneError::DuplicateName(name));
        }
        let surface = match cells {
            Some(cells) => CellSurface::from_cells(cells, width, height, width, height)?,
            None => CellSurface::new(width, height)?,
        };
        Ok(Layer {
            name,
            visible: true,
            surface,
        })
    }

    /// Add a layer on top of the others.
    pub fn add(&mut self, name: impl Into<String>, width: i32, height: i32, cells: Option<Vec<GlyphCell>>) -> Result<&mut Layer> {
        let layer = self.build(name.into(), width, height, cells)?;
        log::debug!("add layer `{}` ({width}x{height}) at {}", layer.name, self.layers.len());
        let index = self.layers.len();
        self.layers.push(layer);
        Ok(&mut self.layers[index])
    }

    /// Insert a layer at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, name: impl Into<String>, width: i32, height: i32, cells: Option<Vec<GlyphCell>>) -> Result<&mut Layer> {
        let layer = self.build(name.into(), width, height, cells)?;
        let index = index.min(self.layers.len());
        log::debug!("insert layer `{}` ({width}x{height}) at {index}", layer.name);
        self.layers.insert(index, layer);
        Ok(&mut self.layers[index])
    }

    /// Remove a layer by name.
    ///
    /// Removing a name that is not in the set is an error, not a no-op.
    pub fn remove(&mut self, name: &str) -> Result<Layer> {
        let index = self.position(name).ok_or_else(|| SceneError::layer_not_found(name))?;
        log::debug!("remove layer `{name}`");
        Ok(self.layers.remove(index))
    }

    /// Look up a layer by name.
    pub fn get(&self, name: &str) -> Result<&Layer> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| SceneError::layer_not_found(name))
    }

    /// Look up a layer by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| SceneError::layer_not_found(name))
    }

    /// Render-order index of a layer.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| SceneError::layer_not_found(name))
    }

    /// Move a layer to a new render-order index (clamped to the end).
    pub fn move_to(&mut self, name: &str, index: usize) -> Result<()> {
        let from = self.index_of(name)?;
        let layer = self.layers.remove(from);
        let to = index.min(self.layers.len());
        self.layers.insert(to, layer);
        if from != to {
            self.layers[to].surface.set_dirty(true);
        }
        Ok(())
    }

    /// Show or hide a layer. No cells are reallocated.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<()> {
        self.get_mut(name)?.set_visible(visible);
        Ok(())
    }

    /// All layers, back to front.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// All layers, back to front, mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Layer> {
        self.layers.iter_mut()
    }

    /// Visible layers, back to front.
    pub fn visible(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// True if any layer is dirty.
    pub fn is_dirty(&self) -> bool {
        self.layers.iter().any(|l| l.surface.is_dirty())
    }

    /// Clear the dirty flag of every layer.
    pub fn clear_dirty(&mut self) {
        for layer in &mut self.layers {
            layer.surface.set_dirty(false);
        }
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

impl SurfaceResize for LayerSet {
    /// Resize every layer, or none of them if any layer would fail.
    fn resize(&mut self, view_width: i32, view_height: i32, buffer_width: i32, buffer_height: i32, clear: bool) -> Result<()> {
        for layer in &self.layers {
            layer.surface.check_resize(view_width, view_height, buffer_width, buffer_height, clear)?;
        }
        for layer in &mut self.layers {
            layer.surface.resize(view_width, view_height, buffer_width, buffer_height, clear)?;
        }
        Ok(())
    }

    /// Resize every layer's view, or none of them if any layer would fail.
    fn resize_view(&mut self, width: i32, height: i32, clear: bool) -> Result<()> {
        for layer in &self.layers {
            layer.surface.check_resize_view(width, height, clear)?;
        }
        for layer in &mut self.layers {
            layer.surface.resize_view(width, height, clear)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn names(set: &LayerSet) -> Vec<&str> {
        set.iter().map(Layer::name).collect()
    }

    #[test]
    fn test_add_keeps_render_order() {
        let mut set = LayerSet::new();
        set.add("ground", 4, 4, None).unwrap();
        set.add("items", 4, 4, None).unwrap();
        set.add("fog", 4, 4, None).unwrap();
        assert_eq!(names(&set), ["ground", "items", "fog"]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut set = LayerSet::new();
        set.add("ground", 4, 4, None).unwrap();
        let err = set.add("ground", 2, 2, None).unwrap_err();
        assert_eq!(err, SceneError::DuplicateName("ground".into()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_with_cells() {
        let mut set = LayerSet::new();
        let cells = vec![GlyphCell::from_char('~'); 6];
        let layer = set.add("water", 3, 2, Some(cells)).unwrap();
        assert_eq!(layer.surface().cell(2, 1).unwrap().glyph_char(), Some('~'));

        let err = set.add("bad", 3, 3, Some(vec![GlyphCell::default(); 4])).unwrap_err();
        assert!(matches!(err, SceneError::SizeMismatch { expected: 9, actual: 4 }));
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut set = LayerSet::new();
        set.add("ground", 4, 4, None).unwrap();
        assert!(matches!(set.remove("sky"), Err(SceneError::NotFound { kind: "layer", .. })));
        assert_eq!(set.remove("ground").unwrap().name(), "ground");
        assert!(set.is_empty());
    }

    #[test]
    fn test_hidden_layer_keeps_its_place() {
        let mut set = LayerSet::new();
        set.add("a", 2, 2, None).unwrap();
        set.add("b", 2, 2, None).unwrap();
        set.add("c", 2, 2, None).unwrap();

        set.set_visible("b", false).unwrap();
        assert_eq!(names(&set), ["a", "b", "c"]);
        let visible: Vec<_> = set.visible().map(Layer::name).collect();
        assert_eq!(visible, ["a", "c"]);
        assert!(!set.get("b").unwrap().is_visible());
    }

    #[test]
    fn test_composite_dirty_is_any_layer_dirty() {
        let mut set = LayerSet::new();
        set.add("a", 2, 2, None).unwrap();
        set.add("b", 2, 2, None).unwrap();
        assert!(set.is_dirty());

        set.clear_dirty();
        assert!(!set.is_dirty());
        assert!(set.iter().all(|l| !l.surface().is_dirty()));

        set.get_mut("b").unwrap().surface_mut().set_glyph(0, 0, 1).unwrap();
        assert!(set.is_dirty());
        assert!(!set.get("a").unwrap().surface().is_dirty());

        set.clear_dirty();
        set.set_visible("a", false).unwrap();
        assert!(set.is_dirty());
    }

    #[test]
    fn test_move_and_insert() {
        let mut set = LayerSet::new();
        set.add("a", 2, 2, None).unwrap();
        set.add("b", 2, 2, None).unwrap();
        set.insert(0, "z", 2, 2, None).unwrap();
        assert_eq!(names(&set), ["z", "a", "b"]);

        set.move_to("z", 10).unwrap();
        assert_eq!(names(&set), ["a", "b", "z"]);
        assert_eq!(set.index_of("b").unwrap(), 1);
    }

    #[test]
    fn test_resize_every_layer() {
        let mut set = LayerSet::new();
        set.add("a", 2, 2, None).unwrap();
        set.add("b", 2, 2, None).unwrap();
        set.resize(3, 3, 6, 6, false).unwrap();
        assert!(set.iter().all(|l| l.surface().width() == 6 && l.surface().view_width() == 3));
    }

    #[test]
    fn test_failed_resize_view_leaves_every_layer_unchanged() {
        let mut set = LayerSet::new();
        set.add("big", 10, 10, None).unwrap();
        set.add("small", 4, 4, None).unwrap();
        set.clear_dirty();

        let err = set.resize_view(6, 6, false).unwrap_err();
        assert!(matches!(err, SceneError::InvalidDimension { buffer_width: 4, .. }));
        assert_eq!(set.get("big").unwrap().surface().view(), Rect::from_size(10, 10));
        assert_eq!(set.get("small").unwrap().surface().view(), Rect::from_size(4, 4));
        assert!(!set.is_dirty());

        set.resize_view(3, 3, false).unwrap();
        assert!(set.iter().all(|l| l.surface().view() == Rect::from_size(3, 3)));
    }

    #[test]
    fn test_failed_resize_leaves_every_layer_unchanged() {
        let mut set = LayerSet::new();
        set.add("a", 4, 4, None).unwrap();
        set.add("b", 4, 4, None).unwrap();
        set.get_mut("a").unwrap().surface_mut().set_glyph(1, 1, 9).unwrap();

        let mut alias = CellSurface::new(1, 1).unwrap();
        alias.set_surface(set.get("b").unwrap().surface(), Rect::from_size(2, 2)).unwrap();
        let guard = alias.cell_mut(0, 0).unwrap();

        assert_eq!(set.resize(4, 4, 8, 8, false), Err(SceneError::CellsBorrowed));
        assert!(set.iter().all(|l| l.surface().width() == 4));
        drop(guard);

        set.resize(4, 4, 8, 8, false).unwrap();
        assert_eq!(set.get("a").unwrap().surface().cell(1, 1).unwrap().glyph(), 9);
        assert!(set.iter().all(|l| l.surface().width() == 8));
    }
}
