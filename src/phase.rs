//! Rendering a whole game phase onto a map.
//!
//! A `PhaseView` is the snapshot game logic hands over: where units
//! stand, who owns which supply center, the orders given and how they
//! resolved. Its JSON form uses the same PascalCase keys as the game
//! server's phase records.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::map::{DippyMap, MapError, UnitType};
use crate::scene::{Assets, Scene};

/// Resolution string of an order that succeeded.
pub const RESOLUTION_OK: &str = "OK";

/// Errors raised while rendering a phase.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("no color assigned to nation '{0}'")]
    UnknownNation(String),

    #[error("failed to build render pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A unit as listed in a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitView {
    #[serde(rename = "Type")]
    pub unit_type: UnitType,
    pub nation: String,
}

/// Snapshot of one game phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PhaseView {
    pub variant: String,
    /// Nations of the variant, in the order colors are handed out.
    pub nations: Vec<String>,
    /// Province to unit standing there.
    pub units: BTreeMap<String, UnitView>,
    /// Province to unit dislodged from it.
    pub dislodgeds: BTreeMap<String, UnitView>,
    /// Supply center province to owning nation.
    pub supply_centers: BTreeMap<String, String>,
    /// Every super-province of the map (no coast ids).
    pub provinces: Vec<String>,
    /// Provinces holding a supply center.
    pub supply_center_provinces: BTreeSet<String>,
    /// Nation to province to order tail (the tuple without its province).
    pub orders: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Province to resolution, `OK` for success.
    pub resolutions: BTreeMap<String, String>,
}

impl PhaseView {
    /// Parses a phase from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn color_of<'c>(colors: &'c BTreeMap<String, String>, nation: &str) -> Result<&'c str, PhaseError> {
    colors
        .get(nation)
        .map(String::as_str)
        .ok_or_else(|| PhaseError::UnknownNation(nation.to_string()))
}

/// Draws `phase` onto `map`.
///
/// Units go first, then dislodged units. Owned supply centers are colored
/// and every other province hidden before the province layer is shown.
/// Orders follow in their nation's color, and every province whose
/// resolution is not `OK` gets a cross.
pub fn render_phase(
    map: &mut DippyMap<'_>,
    phase: &PhaseView,
    colors: &BTreeMap<String, String>,
    config: &RenderConfig,
) -> Result<(), PhaseError> {
    for (province, unit) in &phase.units {
        let color = color_of(colors, &unit.nation)?;
        map.add_unit(&unit.unit_type.template_id(), province, color, false, false, None)?;
    }
    for (province, unit) in &phase.dislodgeds {
        let color = color_of(colors, &unit.nation)?;
        map.add_unit(&unit.unit_type.template_id(), province, color, true, false, None)?;
    }

    for province in &phase.provinces {
        let owner = phase
            .supply_center_provinces
            .contains(province)
            .then(|| phase.supply_centers.get(province))
            .flatten();
        match owner {
            Some(nation) => map.color_province(province, color_of(colors, nation)?)?,
            None => map.hide_province(province)?,
        }
    }
    map.show_provinces()?;

    for (nation, orders) in &phase.orders {
        let color = color_of(colors, nation)?;
        for (province, tail) in orders {
            let tuple: Vec<&str> = std::iter::once(province.as_str())
                .chain(tail.iter().map(String::as_str))
                .collect();
            map.add_order_tuple(&tuple, color)?;
        }
    }

    for (province, resolution) in &phase.resolutions {
        if resolution != RESOLUTION_OK {
            map.add_cross(province, &config.failed_resolution_color)?;
        }
    }
    debug!(
        variant = %phase.variant,
        units = phase.units.len(),
        orders = phase.orders.values().map(BTreeMap::len).sum::<usize>(),
        "phase rendered"
    );
    Ok(())
}

/// Renders each phase onto its own copy of `base` and serializes it.
///
/// Phases are rendered in parallel on a pool of `config.threads` workers.
/// The result holds one entry per phase, in input order; a failing phase
/// does not affect the others.
pub fn render_history(
    base: &Scene,
    assets: &Assets,
    phases: &[PhaseView],
    colors: &BTreeMap<String, String>,
    config: &RenderConfig,
) -> Result<Vec<Result<String, PhaseError>>, PhaseError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    info!(phases = phases.len(), threads = config.threads, "rendering history");

    let rendered: Vec<Result<String, PhaseError>> = pool.install(|| {
        phases
            .par_iter()
            .enumerate()
            .map(|(i, phase)| -> Result<String, PhaseError> {
                let mut scene = base.clone();
                let mut map = DippyMap::new(&mut scene, assets);
                render_phase(&mut map, phase, colors, config).map_err(|e| {
                    warn!(index = i, error = %e, "phase failed to render");
                    e
                })?;
                Ok(scene.to_svg())
            })
            .collect()
    });
    Ok(rendered)
}
