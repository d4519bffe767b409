//! MemoryDocument - Arena-backed headless host tree.
//!
//! Nodes are indices into a slot vector rather than heap objects:
//! - Free index pool for O(1) reuse
//! - Removing a node releases its whole subtree
//! - Every structural or attribute change can be recorded in a mutation
//!   log, so callers can assert exactly what a render touched. Recording is
//!   off unless asked for with [`MemoryDocument::with_mutation_log`]
//!
//! Attributes are stored sorted, so two documents that received the same
//! attributes in a different order still compare equal in snapshots.

use std::collections::BTreeMap;
use std::fmt::Write;

use tracing::{debug, warn};

use super::HostAdapter;
use crate::primitives::{Event, EventHandler, PropValue};

// =============================================================================
// Node Types
// =============================================================================

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a host node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKind {
    Element(String),
    Text(String),
    Fragment,
}

struct NodeData {
    kind: HostKind,
    attrs: BTreeMap<String, String>,
    listeners: BTreeMap<String, EventHandler>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: HostKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            listeners: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// One recorded change to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(NodeId),
    SetAttribute { node: NodeId, key: String, value: String },
    RemoveAttribute { node: NodeId, key: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    Append { parent: NodeId, child: NodeId },
    Remove { parent: NodeId, child: NodeId },
    Replace { parent: NodeId, old: NodeId, new: NodeId },
    Clear(NodeId),
}

/// Structural copy of a subtree, for equivalence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        listeners: Vec<String>,
        children: Vec<Snapshot>,
    },
    Text(String),
    Fragment(Vec<Snapshot>),
}

// =============================================================================
// Document
// =============================================================================

/// Headless host tree.
#[derive(Default)]
pub struct MemoryDocument {
    nodes: Vec<Option<NodeData>>,
    free: Vec<usize>,
    mutations: Vec<Mutation>,
    recording: bool,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document that records every change in its mutation log.
    pub fn with_mutation_log() -> Self {
        Self {
            recording: true,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Allocation
    // -------------------------------------------------------------------------

    fn alloc(&mut self, kind: HostKind) -> NodeId {
        let data = Some(NodeData::new(kind));
        let id = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = data;
                NodeId(index)
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.record(Mutation::Create(id));
        id
    }

    /// Release a node and, recursively, all of its children.
    fn release(&mut self, id: NodeId) {
        let Some(data) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for child in data.children {
            self.release(child);
        }
        self.free.push(id.0);
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Unlink a node from its current parent, if it has one.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.data(id).and_then(|d| d.parent) else {
            return;
        };
        if let Some(parent_data) = self.data_mut(parent) {
            parent_data.children.retain(|&c| c != id);
        }
        if let Some(data) = self.data_mut(id) {
            data.parent = None;
        }
    }

    /// Take the children out of a fragment, leaving it empty.
    fn drain_fragment(&mut self, id: NodeId) -> Option<Vec<NodeId>> {
        let data = self.data_mut(id)?;
        if data.kind != HostKind::Fragment {
            return None;
        }
        Some(std::mem::take(&mut data.children))
    }

    /// Insert `children` into `parent` at `pos`, fixing up parent links.
    fn insert_at(&mut self, parent: NodeId, pos: usize, children: &[NodeId]) {
        for &child in children {
            if let Some(data) = self.data_mut(child) {
                data.parent = Some(parent);
            }
        }
        if let Some(parent_data) = self.data_mut(parent) {
            let pos = pos.min(parent_data.children.len());
            parent_data.children.splice(pos..pos, children.iter().copied());
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self, id: NodeId) -> Option<&HostKind> {
        self.data(id).map(|d| &d.kind)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            HostKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            HostKind::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.data(id)?.attrs.get(key).map(String::as_str)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id)?.parent
    }

    /// First element with `tag` under `root`, depth-first in document order.
    pub fn find(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.children(root).iter().find_map(|&child| {
            if self.tag(child) == Some(tag) {
                Some(child)
            } else {
                self.find(child, tag)
            }
        })
    }

    /// Clone out the handler registered for `event`, if any.
    pub fn listener(&self, id: NodeId, event: &str) -> Option<EventHandler> {
        self.data(id)?.listeners.get(event).cloned()
    }

    pub fn has_listener(&self, id: NodeId, event: &str) -> bool {
        self.listener(id, event).is_some()
    }

    /// Fire `event` at `id`. Returns the delivered event, or `None` when no
    /// handler is registered.
    pub fn dispatch(&self, id: NodeId, event: &str) -> Option<Event> {
        let handler = self.listener(id, event)?;
        let event = Event::new(event);
        handler.call(&event);
        Some(event)
    }

    // -------------------------------------------------------------------------
    // Mutation log
    // -------------------------------------------------------------------------

    /// Start or stop recording. Stopping also drops what was recorded.
    pub fn set_mutation_log(&mut self, on: bool) {
        self.recording = on;
        if !on {
            self.mutations.clear();
        }
    }

    pub fn records_mutations(&self) -> bool {
        self.recording
    }

    fn record(&mut self, mutation: Mutation) {
        if self.recording {
            self.mutations.push(mutation);
        }
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Return and clear the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    pub fn snapshot(&self, id: NodeId) -> Option<Snapshot> {
        let data = self.data(id)?;
        let children = self.snapshot_children(id);
        Some(match &data.kind {
            HostKind::Text(value) => Snapshot::Text(value.clone()),
            HostKind::Fragment => Snapshot::Fragment(children),
            HostKind::Element(tag) => Snapshot::Element {
                tag: tag.clone(),
                attrs: data.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                listeners: data.listeners.keys().cloned().collect(),
                children,
            },
        })
    }

    pub fn snapshot_children(&self, id: NodeId) -> Vec<Snapshot> {
        self.children(id)
            .iter()
            .filter_map(|&child| self.snapshot(child))
            .collect()
    }

    /// Serialize a node and its subtree as HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize only the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.data(id) else { return };
        match &data.kind {
            HostKind::Text(value) => out.push_str(&escape(value)),
            HostKind::Fragment => {
                for &child in &data.children {
                    self.write_html(child, out);
                }
            }
            HostKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in &data.attrs {
                    let _ = write!(out, " {key}=\"{}\"", escape(value));
                }
                out.push('>');
                for &child in &data.children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// HostAdapter
// =============================================================================

impl HostAdapter for MemoryDocument {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(HostKind::Element(tag.to_string()))
    }

    fn create_text(&mut self, value: &str) -> NodeId {
        self.alloc(HostKind::Text(value.to_string()))
    }

    fn create_fragment(&mut self) -> NodeId {
        self.alloc(HostKind::Fragment)
    }

    fn set_attribute(&mut self, node: &NodeId, key: &str, value: &PropValue) {
        let Some(value) = value.to_attribute() else {
            warn!(key, "handler values cannot be stored as attributes");
            return;
        };
        let Some(data) = self.data_mut(*node) else { return };
        if !matches!(data.kind, HostKind::Element(_)) {
            debug!(?node, key, "attribute on non-element node ignored");
            return;
        }
        data.attrs.insert(key.to_string(), value.clone());
        self.record(Mutation::SetAttribute {
            node: *node,
            key: key.to_string(),
            value,
        });
    }

    fn remove_attribute(&mut self, node: &NodeId, key: &str) {
        let Some(data) = self.data_mut(*node) else { return };
        if data.attrs.remove(key).is_some() {
            self.record(Mutation::RemoveAttribute {
                node: *node,
                key: key.to_string(),
            });
        }
    }

    fn add_event_listener(&mut self, node: &NodeId, event: &str, handler: EventHandler) {
        let Some(data) = self.data_mut(*node) else { return };
        data.listeners.insert(event.to_string(), handler);
        self.record(Mutation::AddListener {
            node: *node,
            event: event.to_string(),
        });
    }

    fn remove_event_listener(&mut self, node: &NodeId, event: &str) {
        let Some(data) = self.data_mut(*node) else { return };
        if data.listeners.remove(event).is_some() {
            self.record(Mutation::RemoveListener {
                node: *node,
                event: event.to_string(),
            });
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: NodeId) {
        if *parent == child || !self.contains(*parent) {
            return;
        }
        let end = self.children(*parent).len();
        if let Some(kids) = self.drain_fragment(child) {
            self.insert_at(*parent, end, &kids);
            for kid in kids {
                self.record(Mutation::Append { parent: *parent, child: kid });
            }
            self.release(child);
            return;
        }
        self.detach(child);
        let end = self.children(*parent).len();
        self.insert_at(*parent, end, &[child]);
        self.record(Mutation::Append { parent: *parent, child });
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.parent(*child) != Some(*parent) {
            debug!(?parent, ?child, "remove_child: not a child of parent");
            return;
        }
        self.detach(*child);
        self.release(*child);
        self.record(Mutation::Remove {
            parent: *parent,
            child: *child,
        });
    }

    fn replace_child(&mut self, parent: &NodeId, old: &NodeId, new: NodeId) {
        if self.parent(*old) != Some(*parent) {
            warn!(?parent, ?old, "replace_child: old node is not a child of parent");
            self.release(new);
            return;
        }
        if let Some(kids) = self.drain_fragment(new) {
            self.release(new);
            let pos = self.children(*parent).iter().position(|c| c == old).unwrap_or(0);
            self.detach(*old);
            self.insert_at(*parent, pos, &kids);
            self.release(*old);
            for kid in kids {
                self.record(Mutation::Replace { parent: *parent, old: *old, new: kid });
            }
            return;
        }
        self.detach(new);
        let pos = self.children(*parent).iter().position(|c| c == old).unwrap_or(0);
        self.detach(*old);
        self.insert_at(*parent, pos, &[new]);
        self.release(*old);
        self.record(Mutation::Replace {
            parent: *parent,
            old: *old,
            new,
        });
    }

    fn child_at(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.children(*parent).get(index).copied()
    }

    fn clear_contents(&mut self, container: &NodeId) {
        let Some(data) = self.data_mut(*container) else { return };
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.release(child);
        }
        self.record(Mutation::Clear(*container));
    }
}

// =============================================================================
// Tests
// =============================================================================
