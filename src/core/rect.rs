//! Axis-Aligned Rectangles
//!
//! The single geometric primitive of the simulation. Rectangles are
//! value types in world units (pixels, y grows downward).

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle `{x, y, width, height}`.
///
/// `(x, y)` is the top-left corner. Occupied space is half-open:
/// `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rectangle {
    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same size, moved by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        let moved = self.position() + offset;
        Self {
            x: moved.x,
            y: moved.y,
            ..*self
        }
    }

    /// True when the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap test against another rectangle.
    #[inline]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        intersects(self, other)
    }

    /// Truncate to integer pixels for drawing.
    ///
    /// This is the only place simulation coordinates lose precision.
    #[inline]
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            x: self.x as i32,
            y: self.y as i32,
            width: self.width as i32,
            height: self.height as i32,
        }
    }
}

/// Integer rectangle handed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

/// Axis-aligned overlap test.
///
/// Both rectangles are treated as half-open on all four edges, so
/// rectangles that only share an edge do not intersect.
#[inline]
pub fn intersects(a: &Rectangle, b: &Rectangle) -> bool {
    a.left() < b.right()
        && a.right() > b.left()
        && a.top() < b.bottom()
        && a.bottom() > b.top()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_intersects_shared_edge_is_not_overlap() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let right = Rectangle::new(10.0, 0.0, 10.0, 10.0);
        let below = Rectangle::new(0.0, 10.0, 10.0, 10.0);
        assert!(!intersects(&a, &right));
        assert!(!intersects(&a, &below));
        assert!(!intersects(&right, &a));
        assert!(!intersects(&below, &a));
    }

    #[test]
    fn test_intersects_containment() {
        let outer = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rectangle::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(50.0, -50.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_empty_rect_on_edge() {
        let zero = Rectangle::ZERO;
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(zero.is_empty());
        // A degenerate rect on the boundary does not reach inside the half-open area.
        assert!(!zero.intersects(&r));
    }

    #[test]
    fn test_to_pixels_truncates() {
        let r = Rectangle::new(10.9, 20.2, 30.7, 49.99);
        assert_eq!(
            r.to_pixels(),
            PixelRect { x: 10, y: 20, width: 30, height: 49 }
        );
    }

    #[test]
    fn test_translated() {
        let r = Rectangle::new(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(10.0, -2.0));
        assert_eq!(r, Rectangle::new(11.0, 0.0, 3.0, 4.0));
    }
}
