//! Province anchor resolution.
//!
//! Every province `p` has a sibling marker `pCenter` whose path data starts
//! with `m x,y`. The anchor is that moveto pair, shifted by the marker's
//! parent `translate(x,y)` if any, plus a fixed correction for the marker's
//! own size.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use super::{DippyMap, MapError};
use crate::geometry::Point;
use crate::scene::{parse_translate, NodeId, Scene};

/// Correction applied to every anchor to compensate for the marker artwork.
pub const ANCHOR_CORRECTION: Point = Point::new(-1.5, -2.0);

/// Suffix of the marker element id for a province.
pub const CENTER_SUFFIX: &str = "Center";

fn moveto_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^m\s+([\d.eE+-]+)\s*,\s*([\d.eE+-]+)(?:\s|$)").expect("moveto pattern is valid")
    })
}

/// Parses the leading `m x,y` pair of a path's data.
pub fn parse_moveto(data: &str) -> Option<Point> {
    let caps = moveto_regex().captures(data.trim_start())?;
    let x = caps[1].parse::<f64>().ok()?;
    let y = caps[2].parse::<f64>().ok()?;
    Some(Point::new(x, y))
}

/// Reads the translation carried by `node`'s `transform` attribute.
///
/// A missing attribute is no translation; anything but `translate(x,y)` is
/// an error since the offset could not be honored.
pub(crate) fn node_translation(scene: &Scene, node: NodeId) -> Result<Point, MapError> {
    match scene.attr(node, "transform") {
        None => Ok(Point::ORIGIN),
        Some(t) => parse_translate(t).ok_or_else(|| MapError::MalformedTransform(t.to_string())),
    }
}

impl DippyMap<'_> {
    /// Returns the anchor point of `province` in document coordinates.
    pub fn center_of(&self, province: &str) -> Result<Point, MapError> {
        let marker_id = format!("{}{}", province, CENTER_SUFFIX);
        let marker = self
            .scene
            .find_by_id(&marker_id)
            .ok_or_else(|| MapError::MissingAnchor(province.to_string()))?;
        let data = self.scene.attr(marker, "d").unwrap_or_default();
        let raw = parse_moveto(data).ok_or_else(|| MapError::MalformedAnchor {
            province: province.to_string(),
            data: data.to_string(),
        })?;
        let shift = match self.scene.parent(marker) {
            Some(parent) => node_translation(self.scene(), parent)?,
            None => Point::ORIGIN,
        };
        let center = raw.add(shift).add(ANCHOR_CORRECTION);
        trace!(province, x = center.x, y = center.y, "resolved anchor");
        Ok(center)
    }
}
