//! Named template documents.
//!
//! Unit artwork (`unitArmy`, `unitFleet`, ...) and alternative map
//! documents are kept out of the live scene and cloned into it on demand.

use std::collections::HashMap;
use std::path::Path;

use super::document::{Scene, SceneError};

/// Template documents keyed by source id.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    documents: HashMap<String, Scene>,
}

impl Assets {
    pub fn new() -> Self {
        Assets::default()
    }

    /// Registers (or replaces) a document under `id`.
    pub fn insert(&mut self, id: impl Into<String>, scene: Scene) {
        self.documents.insert(id.into(), scene);
    }

    /// Parses `svg` and registers it under `id`.
    pub fn insert_svg(&mut self, id: impl Into<String>, svg: &str) -> Result<(), SceneError> {
        let scene = Scene::parse(svg)?;
        self.insert(id, scene);
        Ok(())
    }

    /// Loads a document from disk and registers it under `id`.
    pub fn load(&mut self, id: impl Into<String>, path: &Path) -> Result<(), SceneError> {
        let scene = Scene::load(path)?;
        self.insert(id, scene);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Scene, SceneError> {
        self.documents
            .get(id)
            .ok_or_else(|| SceneError::MissingAsset(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
