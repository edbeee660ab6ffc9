//! Surface module: Glyph cells and the grids that own them.
//!
//! This module contains:
//! - [`GlyphCell`]: One character cell's visual state
//! - [`CellSurface`]: A grid of cells with a view and dirty flag
//! - [`LayerSet`]: Named, independently visible surfaces stacked into one
//! - Capability traits ([`Surface`], [`SurfaceResize`], [`SurfaceSettable`])

mod cell;
mod cell_surface;
mod layered;
mod traits;

pub use cell::{CellEffect, EffectHandle, GlyphCell, Mirror, Rgb, Tint};
pub use cell_surface::{CellMut, CellSurface};
pub use layered::{Layer, LayerSet};
pub use traits::{Surface, SurfaceResize, SurfaceSettable};
