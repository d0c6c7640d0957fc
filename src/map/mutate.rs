//! Province and layer mutations.
//!
//! Coloring and hiding restyle the province shape itself. Highlights are
//! separate striped copies in the `highlights` layer, so the original
//! styling survives underneath and removing the copy restores the map.

use tracing::debug;

use super::{DippyMap, MapError};
use crate::scene::{NodeId, HIGHLIGHTS_LAYER, ORDERS_LAYER, PROVINCES_LAYER};

/// Suffix of a province's highlight overlay id.
pub const HIGHLIGHT_SUFFIX: &str = "_highlight";

/// Fill opacity of a colored province.
pub const PROVINCE_FILL_OPACITY: &str = "0.8";

/// Paint used by highlight overlays; the document must define `stripes`.
pub const HIGHLIGHT_STYLE: &str = "fill:url(#stripes)";

impl DippyMap<'_> {
    pub(crate) fn province_node(&self, province: &str) -> Result<NodeId, MapError> {
        self.scene
            .find_by_id(province)
            .ok_or_else(|| MapError::UnknownProvince(province.to_string()))
    }

    /// Reveals the province layer by dropping its inline style.
    pub fn show_provinces(&mut self) -> Result<(), MapError> {
        let layer = self.scene.layer(PROVINCES_LAYER)?;
        self.scene.remove_attr(layer, "style");
        debug!("provinces layer shown");
        Ok(())
    }

    /// Replaces the whole document with a copy of the asset `source_id`.
    ///
    /// If the asset wraps the map (for example in a `div`), the first `svg`
    /// element inside it is used.
    pub fn copy_svg(&mut self, source_id: &str) -> Result<(), MapError> {
        let source = self.assets.get(source_id)?;
        let root = source.root();
        if source.name(root) == Some("svg") {
            self.scene.replace_with(source);
        } else {
            let svg = source
                .find_element(root, "svg")
                .and_then(|svg| source.extract(svg))
                .ok_or_else(|| MapError::MissingTemplatePart {
                    template: source_id.to_string(),
                    part: "svg".to_string(),
                })?;
            *self.scene = svg;
        }
        debug!(source_id, "document replaced");
        Ok(())
    }

    /// Fills a province with `color` at fixed opacity.
    pub fn color_province(&mut self, province: &str, color: &str) -> Result<(), MapError> {
        let path = self.province_node(province)?;
        self.scene.remove_attr(path, "style");
        self.scene.set_attr(path, "fill", color);
        self.scene.set_attr(path, "fill-opacity", PROVINCE_FILL_OPACITY);
        debug!(province, color, "province colored");
        Ok(())
    }

    /// Makes a province fully transparent while keeping its element.
    pub fn hide_province(&mut self, province: &str) -> Result<(), MapError> {
        let path = self.province_node(province)?;
        self.scene.remove_attr(path, "style");
        self.scene.set_attr(path, "fill", "#ffffff");
        self.scene.set_attr(path, "fill-opacity", "0");
        debug!(province, "province hidden");
        Ok(())
    }

    /// Adds a striped copy of the province to the `highlights` layer.
    ///
    /// The copy takes the nearest `transform` found walking up from the
    /// province (itself included); transforms are not composed. Highlighting
    /// an already highlighted province does nothing.
    pub fn highlight_province(&mut self, province: &str) -> Result<(), MapError> {
        let overlay_id = format!("{}{}", province, HIGHLIGHT_SUFFIX);
        if self.scene.find_by_id(&overlay_id).is_some() {
            return Ok(());
        }
        let prov = self.province_node(province)?;
        let layer = self.scene.layer(HIGHLIGHTS_LAYER)?;
        let transform = std::iter::once(prov)
            .chain(self.scene.ancestors(prov))
            .find_map(|n| self.scene.attr(n, "transform"))
            .map(str::to_string);

        let copy = self
            .scene
            .duplicate(prov)
            .ok_or_else(|| MapError::UnknownProvince(province.to_string()))?;
        self.scene.set_attr(copy, "id", overlay_id);
        self.scene.set_attr(copy, "style", HIGHLIGHT_STYLE);
        self.scene.set_attr(copy, "fill-opacity", "1");
        self.scene.remove_attr(copy, "transform");
        if let Some(t) = transform {
            self.scene.set_attr(copy, "transform", t);
        }
        self.scene.set_attr(copy, "stroke", "none");
        self.scene.append(layer, copy);
        debug!(province, "province highlighted");
        Ok(())
    }

    /// Removes the province's highlight overlay, if any.
    pub fn unhighlight_province(&mut self, province: &str) {
        let overlay_id = format!("{}{}", province, HIGHLIGHT_SUFFIX);
        let overlays = self.scene.find_all_by_id(&overlay_id);
        if !overlays.is_empty() {
            debug!(province, "province unhighlighted");
        }
        for overlay in overlays {
            self.scene.remove(overlay);
        }
    }

    /// Returns true if the province currently has a highlight overlay.
    pub fn is_highlighted(&self, province: &str) -> bool {
        self.scene
            .find_by_id(&format!("{}{}", province, HIGHLIGHT_SUFFIX))
            .is_some()
    }

    /// Deletes every glyph from the `orders` layer.
    pub fn remove_orders(&mut self) -> Result<(), MapError> {
        let layer = self.scene.layer(ORDERS_LAYER)?;
        let count = self.scene.child_elements(layer).count();
        self.scene.clear_children(layer);
        debug!(count, "orders removed");
        Ok(())
    }
}
