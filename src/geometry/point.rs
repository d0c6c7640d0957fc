//! Immutable 2D point.

use std::fmt;

/// Tolerance used when comparing computed coordinates.
pub const EPSILON: f64 = 1e-9;

/// A point (or free vector) in map units. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn add(self, p: Point) -> Point {
        Point::new(self.x + p.x, self.y + p.y)
    }

    pub fn sub(self, p: Point) -> Point {
        Point::new(self.x - p.x, self.y - p.y)
    }

    pub fn mul(self, f: f64) -> Point {
        Point::new(self.x * f, self.y * f)
    }

    /// Divides both coordinates by `f`. Dividing by zero yields non-finite
    /// coordinates; callers must rule that out.
    pub fn div(self, f: f64) -> Point {
        Point::new(self.x / f, self.y / f)
    }

    /// Euclidean norm.
    pub fn len(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotates by 90 degrees: `(x, y) -> (-y, x)`.
    pub fn orth(self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }

    /// Shifts the point by a constant offset.
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns true if both coordinates are within `eps` of `other`'s.
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl fmt::Display for Point {
    /// Formats as `x,y`, the coordinate pair syntax of SVG path data.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
