//! # Glyphstage
//!
//! Scene composition, render invalidation and input routing for
//! character-grid displays.
//!
//! Glyphstage keeps a tree of display objects, each backed by a grid of
//! styled glyph cells, and decides which objects need redrawing, in what
//! order, and which object a mouse or key event belongs to. Rasterizing and
//! polling devices are left to the application.
//!
//! ## Core Concepts
//!
//! - **Cell surfaces**: Grids of [`GlyphCell`]s with a view window and a dirty flag
//! - **Layer sets**: Named surfaces stacked into one object, each independently visible
//! - **Scene ordering**: Siblings draw in ascending sort order; hit-testing walks it backwards
//! - **Input routing**: Enter/exit/click/focus with handlers that can stop propagation
//!
//! ## Example
//!
//! ```rust
//! use glyphstage::{CellSurface, GameHost, HostConfig, Point, RenderData};
//!
//! let mut host = GameHost::new(HostConfig::default());
//! let scene = host.scene_mut();
//! let id = scene.spawn(CellSurface::new(20, 5)?, None)?;
//! scene.set_position(id, Point::new(2, 1))?;
//!
//! assert_eq!(scene.hit_test(Point::new(3, 2)), Some(id));
//! assert!(scene.get(id).unwrap().is_dirty());
//! # Ok::<(), glyphstage::SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod overridable;
pub mod render;
pub mod scene;
pub mod surface;

// Re-exports for convenience
pub use config::HostConfig;
pub use error::{Result, SceneError};
pub use geometry::{Point, Rect};
pub use host::{FrameInfo, GameHost};
pub use input::{
    convert_event, InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseButtons, MouseEvent, MouseEventArgs,
    MouseState, MouseTracker, ObjectMouseState, SceneEvent,
};
pub use overridable::OverridableDefault;
pub use render::{CellSize, FontRef, RenderData, Renderer};
pub use scene::{compare, sort_by_order, FocusBehavior, ObjectId, Scene, SceneObject, SortOrdered};
pub use surface::{
    CellEffect, CellMut, CellSurface, EffectHandle, GlyphCell, Layer, LayerSet, Mirror, Rgb, Surface, SurfaceResize,
    SurfaceSettable, Tint,
};
