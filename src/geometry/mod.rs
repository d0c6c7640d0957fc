//! Plane geometry used to lay out order glyphs.
//!
//! Points and vectors live in the map's local SVG unit space. `PathData`
//! collects move/line/curve/close segments and only turns them into SVG
//! path syntax at the very end, so glyph construction can be tested
//! without a renderer.

pub mod path;
pub mod point;
pub mod vector;

pub use path::{PathData, Segment};
pub use point::Point;
pub use vector::Vector;
