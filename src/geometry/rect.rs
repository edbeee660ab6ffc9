//! Rect: A rectangle primitive for views, areas and hit-testing.

use super::Point;

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Top-left corner.
    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Move the rectangle by an offset.
    #[inline]
    #[must_use]
    pub const fn translate(&self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Same size, new top-left corner.
    #[inline]
    #[must_use]
    pub const fn with_position(&self, position: Point) -> Self {
        Self::new(position.x, position.y, self.width, self.height)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 7)));
        assert!(!rect.contains(Point::new(5, 8)));
        assert!(!rect.contains(Point::new(1, 3)));
    }

    #[test]
    fn test_contains_rect() {
        let buffer = Rect::from_size(20, 10);
        assert!(buffer.contains_rect(&Rect::new(0, 0, 20, 10)));
        assert!(buffer.contains_rect(&Rect::new(5, 5, 15, 5)));
        assert!(!buffer.contains_rect(&Rect::new(5, 5, 16, 5)));
        assert!(!buffer.contains_rect(&Rect::new(-1, 0, 5, 5)));
        assert!(!buffer.contains_rect(&Rect::new(0, 0, 0, 5)));
    }

    #[test]
    fn test_translate_and_intersect() {
        let a = Rect::new(0, 0, 4, 4).translate(Point::new(10, 10));
        assert_eq!(a, Rect::new(10, 10, 4, 4));
        assert!(a.intersects(&Rect::new(12, 12, 4, 4)));
        assert!(!a.intersects(&Rect::new(14, 10, 4, 4)));
    }
}
