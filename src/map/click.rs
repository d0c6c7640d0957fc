//! Interactive hit-regions.
//!
//! A hit-region is an invisible copy of a province appended to the document
//! root, positioned by the sum of every translation from the province up
//! to the root. Clicks are routed through `ClickRegistry::click`, which
//! plays the role of the platform's click event. Non-permanent listeners
//! leave a `Teardown` record behind so `clear_click_listeners` can undo
//! them in bulk.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::resolve::node_translation;
use super::{DippyMap, MapError};
use crate::geometry::Point;
use crate::scene::{format_translate, HIGHLIGHTS_LAYER};

/// Suffix of a province's hit-region id.
pub const CLICK_SUFFIX: &str = "_click";

/// Paint of a hit-region: present for hit-testing, never visible.
pub const CLICK_STYLE: &str = "fill:#000000;fill-opacity:0;stroke:none;";

/// Callback invoked with the clicked province id.
pub type ClickHandler = Box<dyn FnMut(&str)>;

/// Options for `add_click_listener`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// Skip the companion highlight overlay.
    pub nohighlight: bool,
    /// Keep the listener when `clear_click_listeners` runs.
    pub permanent: bool,
}

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

/// What clearing a non-permanent listener has to undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teardown {
    pub handle: ListenerHandle,
    pub province: String,
    pub region_id: String,
    pub highlighted: bool,
}

struct Binding {
    province: String,
    region_id: String,
    highlighted: bool,
    handler: ClickHandler,
}

/// Registered click handlers and the teardowns of non-permanent ones.
#[derive(Default)]
pub struct ClickRegistry {
    next_handle: u64,
    bindings: BTreeMap<ListenerHandle, Binding>,
    teardowns: Vec<Teardown>,
}

impl fmt::Debug for ClickRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickRegistry")
            .field("bindings", &self.bindings.len())
            .field("teardowns", &self.teardowns)
            .finish()
    }
}

impl ClickRegistry {
    pub fn new() -> Self {
        ClickRegistry::default()
    }

    /// Delivers a click on the element `element_id`.
    ///
    /// Returns true if a hit-region handled it, meaning the event must not
    /// trigger default behavior or propagate further.
    pub fn click(&mut self, element_id: &str) -> bool {
        match self
            .bindings
            .values_mut()
            .rev()
            .find(|b| b.region_id == element_id)
        {
            Some(binding) => {
                (binding.handler)(&binding.province);
                true
            }
            None => false,
        }
    }

    /// Number of live listeners, permanent ones included.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Listeners that `clear_click_listeners` would remove.
    pub fn pending_teardowns(&self) -> &[Teardown] {
        &self.teardowns
    }

    /// Returns true if `province` has a live hit-region.
    pub fn is_bound(&self, province: &str) -> bool {
        self.bindings.values().any(|b| b.province == province)
    }

    fn register(&mut self, binding: Binding, permanent: bool) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        if !permanent {
            self.teardowns.push(Teardown {
                handle,
                province: binding.province.clone(),
                region_id: binding.region_id.clone(),
                highlighted: binding.highlighted,
            });
        }
        self.bindings.insert(handle, binding);
        handle
    }

    /// Drops every listener on `province`, returning whether any of them
    /// owned a highlight.
    fn unbind_province(&mut self, province: &str) -> Option<bool> {
        let handles: Vec<ListenerHandle> = self
            .bindings
            .iter()
            .filter(|(_, b)| b.province == province)
            .map(|(h, _)| *h)
            .collect();
        if handles.is_empty() {
            return None;
        }
        let mut highlighted = false;
        for h in &handles {
            if let Some(b) = self.bindings.remove(h) {
                highlighted |= b.highlighted;
            }
        }
        self.teardowns.retain(|t| !handles.contains(&t.handle));
        Some(highlighted)
    }
}

impl DippyMap<'_> {
    /// Makes `province` clickable, calling `handler(province)` on click.
    ///
    /// Unlike highlights, the hit-region sums the translations of every
    /// ancestor. A province already carrying a hit-region has it replaced;
    /// if the new listener cannot be added the old one stays in place.
    /// Listeners added with [`ClickOptions::permanent`] survive
    /// `clear_click_listeners`.
    pub fn add_click_listener(
        &mut self,
        registry: &mut ClickRegistry,
        province: &str,
        handler: impl FnMut(&str) + 'static,
        options: ClickOptions,
    ) -> Result<ListenerHandle, MapError> {
        let prov = self.province_node(province)?;
        let mut offset = Point::ORIGIN;
        for node in std::iter::once(prov).chain(self.scene.ancestors(prov)) {
            offset = offset.add(node_translation(self.scene(), node)?);
        }

        if !options.nohighlight {
            self.scene.layer(HIGHLIGHTS_LAYER)?;
        }

        let region_id = format!("{}{}", province, CLICK_SUFFIX);
        if let Some(had_highlight) = registry.unbind_province(province) {
            self.remove_all(&region_id);
            if had_highlight {
                self.unhighlight_province(province);
            }
        }
        if !options.nohighlight {
            self.highlight_province(province)?;
        }

        let copy = self
            .scene
            .duplicate(prov)
            .ok_or_else(|| MapError::UnknownProvince(province.to_string()))?;
        self.scene.set_attr(copy, "id", region_id.as_str());
        self.scene.set_attr(copy, "style", CLICK_STYLE);
        self.scene.set_attr(copy, "stroke", "none");
        self.scene.set_attr(copy, "transform", format_translate(offset));
        let root = self.scene.root();
        self.scene.append(root, copy);

        let handle = registry.register(
            Binding {
                province: province.to_string(),
                region_id,
                highlighted: !options.nohighlight,
                handler: Box::new(handler),
            },
            options.permanent,
        );
        debug!(province, permanent = options.permanent, "click listener added");
        Ok(handle)
    }

    /// Removes every non-permanent hit-region, its handler and its paired
    /// highlight. Returns how many listeners were cleared.
    pub fn clear_click_listeners(&mut self, registry: &mut ClickRegistry) -> usize {
        let teardowns = std::mem::take(&mut registry.teardowns);
        for t in &teardowns {
            registry.bindings.remove(&t.handle);
            if t.highlighted {
                self.unhighlight_province(&t.province);
            }
            if !self.remove_all(&t.region_id) {
                warn!(province = %t.province, "hit-region already gone");
            }
        }
        if !teardowns.is_empty() {
            debug!(count = teardowns.len(), "click listeners cleared");
        }
        teardowns.len()
    }

    fn remove_all(&mut self, element_id: &str) -> bool {
        let nodes = self.scene.find_all_by_id(element_id);
        let found = !nodes.is_empty();
        for n in nodes {
            self.scene.remove(n);
        }
        found
    }
}
