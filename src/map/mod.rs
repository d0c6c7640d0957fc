//! Overlay rendering onto a live map document.
//!
//! `DippyMap` is a short-lived handle over a caller-owned `Scene` and the
//! template `Assets` it clones units from. Its operations are spread over
//! the submodules: anchor resolution (`resolve`), layer and province
//! mutations (`mutate`), interactive hit-regions (`click`), order glyphs
//! (`glyph`, `order`) and unit icons (`unit`).

pub mod click;
pub mod glyph;
pub mod mutate;
pub mod order;
pub mod ready;
pub mod resolve;
pub mod unit;

use thiserror::Error;

use crate::scene::{Assets, Scene, SceneError};

pub use click::{ClickHandler, ClickOptions, ClickRegistry, ListenerHandle, Teardown};
pub use glyph::{arrow_path, box_path, box_vertices, cross_path};
pub use order::{Order, OrderError, OrderKind};
pub use ready::{ReadyAction, ReadyQueue};
pub use unit::UnitType;

/// Errors raised by map operations.
///
/// Any of these aborts only the operation that raised it; overlays and
/// glyphs added earlier stay in place.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("province '{0}' has no '{0}Center' anchor")]
    MissingAnchor(String),

    #[error("anchor of '{province}' has malformed path data '{data}'")]
    MalformedAnchor { province: String, data: String },

    #[error("unsupported transform '{0}', expected translate(x,y)")]
    MalformedTransform(String),

    #[error("unit template '{template}' has no '{part}' element")]
    MissingTemplatePart { template: String, part: String },

    #[error("an arrow needs 2 or 3 provinces, got {0}")]
    ArrowArity(usize),

    #[error("degenerate arrow through {0:?}")]
    DegenerateArrow(Vec<String>),

    #[error("a box needs at least 3 corners, got {0}")]
    TooFewCorners(usize),
}

/// Handle for drawing onto a map document.
pub struct DippyMap<'a> {
    scene: &'a mut Scene,
    assets: &'a Assets,
}

impl<'a> DippyMap<'a> {
    pub fn new(scene: &'a mut Scene, assets: &'a Assets) -> Self {
        DippyMap { scene, assets }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn assets(&self) -> &Assets {
        self.assets
    }

    /// Runs `action` right away: the document is already loaded.
    pub fn add_ready_action<R>(&mut self, action: impl FnOnce(&mut Self) -> R) -> R {
        action(self)
    }
}
