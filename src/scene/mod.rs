//! Mutable scene graph for SVG map documents.
//!
//! Contains the arena-backed `Scene` tree, translate-transform parsing, and
//! the `Assets` store of named template documents (map variants, unit
//! artwork) that overlays are cloned from.

pub mod assets;
pub mod document;
pub mod transform;

pub use assets::Assets;
pub use document::{NodeId, Scene, SceneError};
pub use transform::{format_translate, parse_translate};

/// Layer holding the province shapes.
pub const PROVINCES_LAYER: &str = "provinces";
/// Layer holding striped highlight overlays.
pub const HIGHLIGHTS_LAYER: &str = "highlights";
/// Layer holding order glyphs.
pub const ORDERS_LAYER: &str = "orders";
/// Layer holding unit icons.
pub const UNITS_LAYER: &str = "units";
