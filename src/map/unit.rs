//! Unit types and unit icon placement.
//!
//! Unit artwork comes from template documents named `unit<Type>`, each
//! holding a `shadow` group plus either a `hull` (fleets and other wide
//! artwork) or a `body` group.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DippyMap, MapError};
use crate::geometry::Point;
use crate::scene::{NodeId, Scene, UNITS_LAYER};

/// Prefix of unit template asset ids.
pub const TEMPLATE_PREFIX: &str = "unit";

/// Nudge applied to a dislodged unit so it does not cover the occupier.
pub const DISLODGED_OFFSET: Point = Point::new(5.0, 5.0);
/// Fill opacity of a dislodged unit.
pub const DISLODGED_OPACITY: f64 = 0.73;

/// Offset from the anchor to the top-left of `hull` artwork.
const HULL_OFFSET: Point = Point::new(-65.0, -26.0);
/// Offset from the anchor to the top-left of `body` artwork.
const BODY_OFFSET: Point = Point::new(-40.0, -16.0);

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the name used in order tuples and phase data.
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Army => "Army",
            UnitType::Fleet => "Fleet",
        }
    }

    /// Parses a unit type from its order-tuple name.
    pub fn from_name(s: &str) -> Option<UnitType> {
        match s {
            "Army" => Some(UnitType::Army),
            "Fleet" => Some(UnitType::Fleet),
            _ => None,
        }
    }

    /// Asset id of this type's artwork, e.g. `unitArmy`.
    pub fn template_id(self) -> String {
        format!("{}{}", TEMPLATE_PREFIX, self.name())
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn template_part(template: &Scene, template_id: &str, part: &str) -> Result<NodeId, MapError> {
    template
        .find_by_id(part)
        .ok_or_else(|| MapError::MissingTemplatePart {
            template: template_id.to_string(),
            part: part.to_string(),
        })
}

impl DippyMap<'_> {
    /// Places a unit icon from template `template_id` on `province`.
    ///
    /// Dislodged units are nudged and faded; builds are drawn black. The
    /// shadow goes in first so the unit paints over it. `layer` defaults
    /// to `units`.
    pub fn add_unit(
        &mut self,
        template_id: &str,
        province: &str,
        color: &str,
        dislodged: bool,
        build: bool,
        layer: Option<&str>,
    ) -> Result<(), MapError> {
        let template = self.assets.get(template_id)?;
        let shadow = template_part(template, template_id, "shadow")?;
        let (art, art_offset) = match template.find_by_id("hull") {
            Some(hull) => (hull, HULL_OFFSET),
            None => (template_part(template, template_id, "body")?, BODY_OFFSET),
        };
        let layer_name = layer.unwrap_or(UNITS_LAYER);
        let target = self.scene.layer(layer_name)?;

        let mut loc = self.center_of(province)?;
        let mut opacity = 1.0;
        if dislodged {
            loc = loc.add(DISLODGED_OFFSET);
            opacity = DISLODGED_OPACITY;
        }
        loc = loc.add(art_offset);
        let fill = if build { "#000000" } else { color };
        let transform = format!("translate({}, {})", loc.x, loc.y);

        let (Some(shadow_copy), Some(unit_copy)) =
            (self.scene.import(template, shadow), self.scene.import(template, art))
        else {
            return Err(MapError::MissingTemplatePart {
                template: template_id.to_string(),
                part: "shadow".to_string(),
            });
        };
        self.scene.set_attr(shadow_copy, "transform", transform.as_str());
        self.scene.set_attr(unit_copy, "transform", transform);
        self.scene.set_attr(
            unit_copy,
            "style",
            format!(
                "fill:{};fill-opacity:{};stroke:#000000;stroke-width:1;stroke-miterlimit:4;stroke-opacity:1;stroke-dasharray:none",
                fill, opacity
            ),
        );
        self.scene.append(target, shadow_copy);
        self.scene.append(target, unit_copy);
        debug!(template_id, province, dislodged, build, layer = layer_name, "unit added");
        Ok(())
    }
}
