//! dippymap: Diplomacy map overlay renderer.
//!
//! Draws units, province coloring, highlights, click regions and order
//! glyphs onto an SVG map document, and renders whole game phases to SVG.

pub mod config;
pub mod geometry;
pub mod map;
pub mod palette;
pub mod phase;
pub mod scene;
