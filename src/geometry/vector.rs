//! Directed segments between two points.

use super::point::Point;

/// A directed segment from `p1` to `p2`.
///
/// `dir` and `orth` divide by the length, so they are only meaningful for
/// non-degenerate segments. Use `try_dir` when the input is not known to
/// be well formed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub p1: Point,
    pub p2: Point,
}

impl Vector {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Vector { p1, p2 }
    }

    pub fn delta(&self) -> Point {
        self.p2.sub(self.p1)
    }

    pub fn len(&self) -> f64 {
        self.delta().len()
    }

    /// Unit direction from `p1` to `p2`.
    pub fn dir(&self) -> Point {
        self.delta().div(self.len())
    }

    /// Unit direction rotated by 90 degrees.
    pub fn orth(&self) -> Point {
        self.dir().orth()
    }

    /// Unit direction, or `None` for a zero-length segment.
    pub fn try_dir(&self) -> Option<Point> {
        let len = self.len();
        if len > 0.0 && len.is_finite() {
            Some(self.delta().div(len))
        } else {
            None
        }
    }

    pub fn midpoint(&self) -> Point {
        self.p1.add(self.delta().div(2.0))
    }
}
