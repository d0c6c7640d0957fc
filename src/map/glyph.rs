//! Order glyph geometry: boxes, arrows and crosses.
//!
//! The path builders here are pure functions of anchor points. The
//! `DippyMap` methods resolve anchors, build the path and append it to the
//! `orders` layer with the glyph's paint.

use std::f64::consts::PI;

use tracing::debug;

use super::{DippyMap, MapError};
use crate::geometry::{PathData, Point, Vector};
use crate::scene::{NodeId, ORDERS_LAYER};

/// Offset from a province anchor to the center of boxes and crosses.
pub const GLYPH_OFFSET: Point = Point::new(-3.0, -3.0);

/// Radius of the outer ring of a box.
pub const BOX_OUTER_RADIUS: f64 = 27.0;
/// Radius of the inner ring of a box.
pub const BOX_INNER_RADIUS: f64 = 20.0;

/// Half-width of an arrow shaft.
pub const ARROW_HALF_WIDTH: f64 = 3.0;

/// Arm length of a cross.
pub const CROSS_BOUND: f64 = 14.0;
/// Arm thickness of a cross.
pub const CROSS_WIDTH: f64 = 4.0;

/// Which kind of glyph a path is painted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    Box,
    Arrow,
    Cross,
}

impl GlyphKind {
    /// Inline style for a glyph of this kind filled with `color`.
    pub fn style(self, color: &str) -> String {
        let (prefix, fill_opacity) = match self {
            GlyphKind::Box => ("fill-rule:evenodd;", "0.9"),
            GlyphKind::Arrow => ("", "0.7"),
            GlyphKind::Cross => ("", "0.9"),
        };
        format!(
            "{}fill:{};stroke:#000000;stroke-width:0.5;stroke-miterlimit:4;stroke-opacity:1.0;fill-opacity:{};",
            prefix, color, fill_opacity
        )
    }
}

/// Corners of a regular polygon around `center`, starting straight up.
///
/// Even corner counts are turned by half a step so a flat edge, not a
/// vertex, faces up.
pub fn box_vertices(center: Point, corners: usize, radius: f64) -> Vec<Point> {
    let step = 2.0 * PI / corners as f64;
    let mut start = PI * 1.5;
    if corners % 2 == 0 {
        start += step / 2.0;
    }
    (0..corners)
        .map(|i| {
            let angle = start + step * i as f64;
            Point::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
        })
        .collect()
}

/// Two concentric polygons forming a ring under the even-odd fill rule.
pub fn box_path(center: Point, corners: usize) -> PathData {
    let mut d = PathData::new();
    d.polygon(&box_vertices(center, corners, BOX_OUTER_RADIUS))
        .polygon(&box_vertices(center, corners, BOX_INNER_RADIUS));
    d
}

/// Closed outline of a curved arrow from `start` through `middle` to `end`.
///
/// The shaft bends at `middle` along the averaged normal of both legs and
/// ends in a head at `end`. Both ends keep a gap from the anchors so the
/// glyph does not cover the province markers. Returns `None` when a leg
/// has zero length or the legs point straight back at each other.
pub fn arrow_path(start: Point, middle: Point, end: Point) -> Option<PathData> {
    let bound = ARROW_HALF_WIDTH;
    let head_width = bound * 3.0;
    let head_length = bound * 6.0;
    let spacer = bound * 2.0;

    let part1 = Vector::new(start, middle);
    let part2 = Vector::new(middle, end);
    let dir1 = part1.try_dir()?;
    let dir2 = part2.try_dir()?;
    let orth1 = dir1.orth();
    let orth2 = dir2.orth();

    let sum_orth = orth1.add(orth2);
    let sum_len = sum_orth.len();
    if sum_len < 1e-9 {
        return None;
    }
    let avg_orth = sum_orth.div(sum_len);

    let start0 = start.add(dir1.mul(spacer)).add(orth1.mul(bound));
    let start1 = start.add(dir1.mul(spacer)).sub(orth1.mul(bound));
    let control0 = middle.add(avg_orth.mul(bound));
    let control1 = middle.sub(avg_orth.mul(bound));
    let neck = end.sub(dir2.mul(spacer + head_length));
    let end0 = neck.add(orth2.mul(bound));
    let end1 = neck.sub(orth2.mul(bound));
    let tip = end.sub(dir2.mul(spacer));
    let head0 = end0.add(orth2.mul(head_width));
    let head1 = end1.sub(orth2.mul(head_width));

    let mut d = PathData::new();
    d.move_to(start0)
        .cubic_to(control0, control0, end0)
        .line_to(head0)
        .line_to(tip)
        .line_to(head1)
        .line_to(end1)
        .cubic_to(control1, control1, start1)
        .close();
    Some(d)
}

/// Twelve-point outline of a diagonal cross centered on `center`.
pub fn cross_path(center: Point) -> PathData {
    let (x, y) = (center.x, center.y);
    let b = CROSS_BOUND;
    let w = CROSS_WIDTH;
    let outline = [
        Point::new(x, y + w),
        Point::new(x + b, y + b + w),
        Point::new(x + b + w, y + b),
        Point::new(x + w, y),
        Point::new(x + b + w, y - b),
        Point::new(x + b, y - b - w),
        Point::new(x, y - w),
        Point::new(x - b, y - b - w),
        Point::new(x - b - w, y - b),
        Point::new(x - w, y),
        Point::new(x - b - w, y + b),
        Point::new(x - b, y + b + w),
    ];
    let mut d = PathData::new();
    d.polygon(&outline);
    d
}

impl DippyMap<'_> {
    /// Appends a painted path to the `orders` layer.
    pub(crate) fn append_glyph(
        &mut self,
        kind: GlyphKind,
        d: &PathData,
        color: &str,
    ) -> Result<NodeId, MapError> {
        let layer = self.scene.layer(ORDERS_LAYER)?;
        let path = self.scene.create_element("path");
        self.scene.set_attr(path, "style", kind.style(color));
        self.scene.set_attr(path, "d", d.to_svg());
        self.scene.append(layer, path);
        debug!(glyph = ?kind, color, "glyph added");
        Ok(path)
    }

    pub(crate) fn box_glyph(&self, province: &str, corners: usize) -> Result<PathData, MapError> {
        if corners < 3 {
            return Err(MapError::TooFewCorners(corners));
        }
        let center = self.center_of(province)?.add(GLYPH_OFFSET);
        Ok(box_path(center, corners))
    }

    pub(crate) fn arrow_glyph<S: AsRef<str>>(&self, provinces: &[S]) -> Result<PathData, MapError> {
        let mut provs: Vec<&str> = provinces.iter().map(AsRef::as_ref).collect();
        if provs.len() == 3 && provs[1] == provs[2] {
            provs.pop();
        }
        let (start, middle, end) = match provs.as_slice() {
            [from, to] => {
                let start = self.center_of(from)?;
                let end = self.center_of(to)?;
                (start, Vector::new(start, end).midpoint(), end)
            }
            [from, via, to] => (self.center_of(from)?, self.center_of(via)?, self.center_of(to)?),
            _ => return Err(MapError::ArrowArity(provinces.len())),
        };
        arrow_path(start, middle, end)
            .ok_or_else(|| MapError::DegenerateArrow(provs.iter().map(|p| p.to_string()).collect()))
    }

    pub(crate) fn cross_glyph(&self, province: &str) -> Result<PathData, MapError> {
        Ok(cross_path(self.center_of(province)?.add(GLYPH_OFFSET)))
    }

    /// Draws a ring-shaped regular polygon with `corners` corners on `province`.
    pub fn add_box(&mut self, province: &str, corners: usize, color: &str) -> Result<NodeId, MapError> {
        let d = self.box_glyph(province, corners)?;
        self.append_glyph(GlyphKind::Box, &d, color)
    }

    /// Draws an arrow through two or three provinces.
    ///
    /// Three provinces whose last two are equal collapse to a straight
    /// two-province arrow.
    pub fn add_arrow<S: AsRef<str>>(&mut self, provinces: &[S], color: &str) -> Result<NodeId, MapError> {
        let d = self.arrow_glyph(provinces)?;
        self.append_glyph(GlyphKind::Arrow, &d, color)
    }

    /// Draws a diagonal cross on `province`.
    pub fn add_cross(&mut self, province: &str, color: &str) -> Result<NodeId, MapError> {
        let d = self.cross_glyph(province)?;
        self.append_glyph(GlyphKind::Cross, &d, color)
    }
}
