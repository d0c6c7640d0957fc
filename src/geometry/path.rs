//! Structured path builder.
//!
//! Glyphs are assembled as a list of segments and serialized to SVG path
//! syntax (`M x,y L x,y C x,y,x,y,x,y z`) only when written to the scene.

use std::fmt::{self, Write as _};

use super::point::Point;

/// A single path command with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bezier with two control points and an end point.
    CubicTo(Point, Point, Point),
    Close,
}

/// An ordered sequence of path segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    segments: Vec<Segment>,
}

impl PathData {
    pub fn new() -> Self {
        PathData { segments: Vec::new() }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(Segment::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(Segment::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.segments.push(Segment::CubicTo(c1, c2, end));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(Segment::Close);
        self
    }

    /// Appends a closed polygon through `points`.
    pub fn polygon(&mut self, points: &[Point]) -> &mut Self {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(*first);
            for p in rest {
                self.line_to(*p);
            }
            self.close();
        }
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of closed subpaths.
    pub fn subpath_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Close))
            .count()
    }

    /// Every absolute point the path passes through or uses as a control.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| {
            let pts: Vec<Point> = match *s {
                Segment::MoveTo(p) | Segment::LineTo(p) => vec![p],
                Segment::CubicTo(c1, c2, p) => vec![c1, c2, p],
                Segment::Close => Vec::new(),
            };
            pts
        })
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points().all(Point::is_finite)
    }

    /// Serializes to the SVG `d` attribute syntax.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for seg in &self.segments {
            if !out.is_empty() {
                out.push(' ');
            }
            match seg {
                Segment::MoveTo(p) => write!(out, "M {}", p)?,
                Segment::LineTo(p) => write!(out, "L {}", p)?,
                Segment::CubicTo(c1, c2, p) => write!(out, "C {},{},{}", c1, c2, p)?,
                Segment::Close => out.push('z'),
            }
        }
        f.write_str(&out)
    }
}
