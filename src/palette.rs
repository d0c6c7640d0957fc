//! Nation colors.
//!
//! Every nation gets a color from the user's preferences if one applies,
//! otherwise a fixed high-contrast color picked by its position in the
//! variant's nation list.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

/// Name of the pseudo-nation that owns nothing.
pub const NEUTRAL_NATION: &str = "Neutral";

/// Color of the neutral pseudo-nation.
pub const NEUTRAL: &str = "#ffffff";

/// High-contrast colors handed out by nation index.
pub const CONTRASTS: [&str; 104] = [
    "#FF2F80", "#0CBD66", "#FF90C9", "#BEC459", "#0086ED", "#FFB500", "#0AA6D8", "#A05837",
    "#EEC3FF", "#456648", "#D790FF", "#6A3A4C", "#324E72", "#A4E804", "#CB7E98", "#0089A3",
    "#404E55", "#FDE8DC", "#5B4534", "#922329", "#3A2465", "#99ADC0", "#BC23FF", "#72418F",
    "#201625", "#FFF69F", "#549E79", "#9B9700", "#772600", "#6B002C", "#6367A9", "#A77500",
    "#7900D7", "#1E6E00", "#C8A1A1", "#04F757", "#3B9700", "#8CD0FF", "#B05B6F", "#00FECF",
    "#575329", "#938A81", "#FF913F", "#A3C8C9", "#636375", "#452C2C", "#00A6AA", "#B4A8BD",
    "#34362D", "#886F4C", "#D157A0", "#FF8A9A", "#FAD09F", "#885578", "#788D66", "#7A87A1",
    "#B77B68", "#456D75", "#6F0062", "#00489C", "#001E09", "#C2FF99", "#C0B9B2", "#CC0744",
    "#A079BF", "#C2FFED", "#372101", "#00846F", "#013349", "#300018", "#A1C299", "#7B4F4B",
    "#000035", "#DDEFFF", "#D16100", "#B903AA", "#FFAA92", "#00C2A0", "#6B7900", "#BA0900",
    "#61615A", "#4A3B53", "#3B5DFF", "#4FC601", "#1B4400", "#FEFFE6", "#809693", "#5A0007",
    "#997D87", "#8FB0FF", "#004D43", "#B79762", "#63FFAC", "#0000A6", "#7A4900", "#FFDBE5",
    "#A30059", "#006FA6", "#008941", "#FF4A46", "#FF34FF", "#1CE6FF", "#FFFF00", "#000000",
];

const HEX: &str = "#(?:[a-fA-F0-9]{6}|[a-fA-F0-9]{8})";

fn override_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{}$", HEX)).expect("color pattern is valid"))
}

fn nation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^(\w+)/({})$", HEX)).expect("color pattern is valid"))
}

fn variant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^(\w+)/(\w+)/({})$", HEX)).expect("color pattern is valid"))
}

/// The contrast color for the nation at `index`, cycling past the end.
pub fn contrast(index: usize) -> &'static str {
    CONTRASTS[index % CONTRASTS.len()]
}

/// A user's color preferences, parsed from entries like `#FF0000`,
/// `France/#0000FF` or `Classical/England/#FFAA00`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorPreferences {
    /// Plain colors, handed to nations without a specific color in order.
    pub overrides: Vec<String>,
    /// Nation name to color, for any variant.
    pub nations: HashMap<String, String>,
    /// Variant name to nation name to color.
    pub variants: HashMap<String, HashMap<String, String>>,
}

impl ColorPreferences {
    /// Parses preference entries. Entries matching no form are skipped.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut prefs = ColorPreferences::default();
        for entry in entries {
            let entry = entry.as_ref();
            if let Some(caps) = variant_re().captures(entry) {
                prefs
                    .variants
                    .entry(caps[1].to_string())
                    .or_default()
                    .insert(caps[2].to_string(), caps[3].to_string());
            } else if let Some(caps) = nation_re().captures(entry) {
                prefs.nations.insert(caps[1].to_string(), caps[2].to_string());
            } else if override_re().is_match(entry) {
                prefs.overrides.push(entry.to_string());
            } else {
                trace!(entry, "ignoring color preference");
            }
        }
        prefs
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.nations.is_empty() && self.variants.is_empty()
    }
}

/// Picks a color for every nation of `variant`.
///
/// Per nation the first match wins: a variant-scoped preference, a nation
/// preference, the next unused override, then `contrast(index)`. The
/// result always maps `Neutral` to `NEUTRAL`.
pub fn assign_colors<S: AsRef<str>>(
    variant: &str,
    nations: &[S],
    prefs: &ColorPreferences,
) -> BTreeMap<String, String> {
    let scoped = prefs.variants.get(variant);
    let mut overrides = prefs.overrides.iter();
    let mut colors = BTreeMap::new();
    for (i, nation) in nations.iter().enumerate() {
        let nation = nation.as_ref();
        let color = scoped
            .and_then(|m| m.get(nation))
            .or_else(|| prefs.nations.get(nation))
            .map(String::as_str)
            .or_else(|| overrides.next().map(String::as_str))
            .unwrap_or_else(|| contrast(i));
        colors.insert(nation.to_string(), color.to_string());
    }
    colors.insert(NEUTRAL_NATION.to_string(), NEUTRAL.to_string());
    colors
}
