//! Geometry primitives: points and rectangles in cell or pixel space.

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;
