//! Arena-backed XML element tree.
//!
//! Nodes live in a `Vec` indexed by `NodeId`. Removing a subtree frees its
//! slots for reuse, so a `NodeId` is only valid until the node it names is
//! removed. Lookups by `id` attribute walk the attached tree in document
//! order and return the first match.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use thiserror::Error;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors raised while loading or querying a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no element with id '{0}'")]
    MissingElement(String),

    #[error("document has no '{0}' layer")]
    MissingLayer(String),

    #[error("no asset document named '{0}'")]
    MissingAsset(String),
}

/// Handle to a node in a `Scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable XML document tree, typically an SVG map.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
    /// Namespace declarations written on the root element: (prefix, uri).
    namespaces: Vec<(Option<String>, String)>,
}

impl Scene {
    fn empty() -> Self {
        Scene {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            namespaces: Vec::new(),
        }
    }

    /// Creates a document holding a single empty root element.
    pub fn new(root_name: &str) -> Self {
        let mut scene = Scene::empty();
        scene.root = scene.create_element(root_name);
        scene
    }

    /// Parses an SVG (or any XML) document.
    ///
    /// DTDs are accepted since editor-exported maps often carry one.
    /// Whitespace-only text, comments and processing instructions are dropped.
    pub fn parse(text: &str) -> Result<Scene, SceneError> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, opts)?;
        let root_el = doc.root_element();

        let mut scene = Scene::empty();
        for el in root_el.descendants().filter(|n| n.is_element()) {
            for ns in el.namespaces() {
                if ns.uri() == XML_NAMESPACE {
                    continue;
                }
                let decl = (ns.name().map(str::to_string), ns.uri().to_string());
                if !scene.namespaces.contains(&decl) {
                    scene.namespaces.push(decl);
                }
            }
        }
        scene.root = scene.build(root_el);
        Ok(scene)
    }

    /// Reads and parses a document from disk.
    pub fn load(path: &std::path::Path) -> Result<Scene, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Scene::parse(&text)
    }

    fn build(&mut self, src: roxmltree::Node<'_, '_>) -> NodeId {
        let attrs = src
            .attributes()
            .map(|a| (qualified_name(src, a.namespace(), a.name()), a.value().to_string()))
            .collect();
        let tag = src.tag_name();
        let id = self.alloc(NodeKind::Element {
            name: qualified_name(src, tag.namespace(), tag.name()),
            attrs,
        });
        for child in src.children() {
            let child_id = if child.is_element() {
                self.build(child)
            } else if child.is_text() {
                match child.text() {
                    Some(t) if !t.trim().is_empty() => self.alloc(NodeKind::Text(t.to_string())),
                    _ => continue,
                }
            } else {
                continue;
            };
            self.attach(id, child_id);
        }
        id
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.node_mut(id).and_then(|n| n.parent.take());
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|c| *c != id);
        }
    }

    /// The document's root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns true if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).last() == Some(self.root)
    }

    /// Tag name of an element node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.name(id).is_some()
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Sets an attribute, replacing any previous value in place.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            let value = value.into();
            match attrs.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value,
                None => attrs.push((key.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, key: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            attrs.retain(|(k, _)| k != key);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Parents of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().copied().filter(|c| self.is_element(*c))
    }

    /// `id` and everything below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if !self.contains(n) {
                continue;
            }
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// First element under `scope` (inclusive) whose `id` attribute equals `element_id`.
    pub fn find_by_id_within(&self, scope: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(element_id))
    }

    /// First attached element whose `id` attribute equals `element_id`.
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.find_by_id_within(self.root, element_id)
    }

    /// Every attached element whose `id` attribute equals `element_id`.
    pub fn find_all_by_id(&self, element_id: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.attr(*n, "id") == Some(element_id))
            .collect()
    }

    /// Like `find_by_id`, but a missing element is an error.
    pub fn require(&self, element_id: &str) -> Result<NodeId, SceneError> {
        self.find_by_id(element_id)
            .ok_or_else(|| SceneError::MissingElement(element_id.to_string()))
    }

    /// Looks up a named layer group such as `orders`.
    pub fn layer(&self, name: &str) -> Result<NodeId, SceneError> {
        self.find_by_id(name)
            .ok_or_else(|| SceneError::MissingLayer(name.to_string()))
    }

    /// Set of `id` attributes of all attached elements.
    pub fn element_ids(&self) -> BTreeSet<String> {
        self.descendants(self.root)
            .into_iter()
            .filter_map(|n| self.attr(n, "id").map(str::to_string))
            .collect()
    }

    /// Number of attached nodes, root included.
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            name: name.to_string(),
            attrs: Vec::new(),
        })
    }

    /// Appends `child` as the last child of `parent`, moving it if it
    /// already has a parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || child == parent {
            return;
        }
        self.detach(child);
        self.attach(parent, child);
    }

    /// Detaches `id` and frees its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        for n in self.descendants(id) {
            self.nodes[n.0] = None;
            self.free.push(n.0);
        }
    }

    /// Removes every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for c in children {
            self.remove(c);
        }
    }

    /// Deep-copies `id` into a new detached subtree of this document.
    pub fn duplicate(&mut self, id: NodeId) -> Option<NodeId> {
        let kind = self.node(id)?.kind.clone();
        let children = self.children(id).to_vec();
        let copy = self.alloc(kind);
        for child in children {
            if let Some(c) = self.duplicate(child) {
                self.attach(copy, c);
            }
        }
        Some(copy)
    }

    /// Deep-copies node `id` of `other` into a new detached subtree here.
    pub fn import(&mut self, other: &Scene, id: NodeId) -> Option<NodeId> {
        let src = other.node(id)?;
        let copy = self.alloc(src.kind.clone());
        for child in &src.children {
            if let Some(c) = self.import(other, *child) {
                self.attach(copy, c);
            }
        }
        for decl in &other.namespaces {
            if !self.namespaces.contains(decl) {
                self.namespaces.push(decl.clone());
            }
        }
        Some(copy)
    }

    /// Copies the subtree at `id` into a standalone document rooted there.
    pub fn extract(&self, id: NodeId) -> Option<Scene> {
        let mut scene = Scene::empty();
        scene.root = scene.import(self, id)?;
        Some(scene)
    }

    /// First element under `scope` (inclusive) with tag name `name`.
    pub fn find_element(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.name(*n) == Some(name))
    }

    /// Replaces this whole document with a copy of `source`.
    pub fn replace_with(&mut self, source: &Scene) {
        *self = source.clone();
    }

    /// Serializes the attached tree back to XML text.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, true, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, is_root: bool, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(t) => escape_into(t, false, out),
            NodeKind::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                if is_root {
                    for (prefix, uri) in &self.namespaces {
                        match prefix {
                            Some(p) => {
                                let _ = write!(out, " xmlns:{}=\"", p);
                            }
                            None => out.push_str(" xmlns=\""),
                        }
                        escape_into(uri, true, out);
                        out.push('"');
                    }
                }
                for (k, v) in attrs {
                    let _ = write!(out, " {}=\"", k);
                    escape_into(v, true, out);
                    out.push('"');
                }
                if node.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for c in &node.children {
                        self.write_node(*c, false, out);
                    }
                    let _ = write!(out, "</{}>", name);
                }
            }
        }
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = match namespace {
        Some(XML_NAMESPACE) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri),
        None => None,
    };
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local),
        _ => local.to_string(),
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attr => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
