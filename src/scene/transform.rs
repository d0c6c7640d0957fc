//! `translate(x,y)` transform attributes.
//!
//! Map assets only ever position groups with plain translations, so that is
//! the only transform form understood here.

use std::sync::OnceLock;

use regex::Regex;

use crate::geometry::Point;

fn translate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^translate\(\s*([\d.eE+-]+)\s*,\s*([\d.eE+-]+)\s*\)$")
            .expect("translate pattern is valid")
    })
}

/// Parses `translate(x,y)` (optionally `translate(x, y)`) into an offset.
///
/// Returns `None` for any other transform syntax.
pub fn parse_translate(transform: &str) -> Option<Point> {
    let caps = translate_regex().captures(transform.trim())?;
    let x = caps[1].parse::<f64>().ok()?;
    let y = caps[2].parse::<f64>().ok()?;
    Some(Point::new(x, y))
}

/// Formats an offset as a `translate(x,y)` attribute value.
pub fn format_translate(p: Point) -> String {
    format!("translate({},{})", p.x, p.y)
}
