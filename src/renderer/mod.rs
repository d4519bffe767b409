//! Reconciler - Materialize, diff, and patch.
//!
//! # Algorithm
//!
//! 1. **resolve** - Expand components and splice fragments so the virtual
//!    tree has the same shape as the host tree it describes
//! 2. **materialize** - Build a fresh host subtree from a virtual node
//! 3. **diff** - Compare two virtual trees position by position and produce
//!    a [`Patch`] tree (pure, no host access)
//! 4. **patch** - Apply a patch tree to the live host tree, touching only
//!    what changed
//!
//! Child diffing is positional: inserting or removing in the middle of a
//! list shifts every later sibling, which is then updated or replaced in
//! place rather than moved.

mod diff;
mod materialize;
mod patch;
mod resolve;

pub use diff::*;
pub use resolve::*;

use crate::host::HostAdapter;
use crate::pipeline::RenderConfig;
use crate::primitives::PropValue;
use crate::state::Hooks;
use crate::types::VNode;

// =============================================================================
// Patch
// =============================================================================

/// One attribute change.
#[derive(Debug, Clone, PartialEq)]
pub enum PropPatch {
    Set(String, PropValue),
    Remove(String),
}

/// Mutation needed at one host position. `None` (as `Option<Patch>`) is the
/// no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Materialize and append.
    Create(VNode),
    /// Remove the host child at this position.
    Remove,
    /// Materialize and substitute for the host child at this position.
    Replace(VNode),
    /// Same node kind and tag: patch attributes, then recurse into children.
    /// `children` has one slot per index across old and new child lists.
    Update {
        props: Vec<PropPatch>,
        children: Vec<Option<Patch>>,
    },
}

impl Patch {
    /// True for an `Update` that changes nothing, recursively.
    pub fn is_noop(&self) -> bool {
        match self {
            Patch::Update { props, children } => {
                props.is_empty() && children.iter().all(|c| is_noop(c.as_ref()))
            }
            _ => false,
        }
    }
}

/// True when applying `patch` would not touch the host tree.
pub fn is_noop(patch: Option<&Patch>) -> bool {
    patch.is_none_or(Patch::is_noop)
}

// =============================================================================
// Reconciler
// =============================================================================

/// Host-facing half of the reconciler: materialization and patch
/// application against one host adapter.
///
/// Components met while materializing are invoked through `hooks`.
pub struct Reconciler<'a, H: HostAdapter> {
    host: &'a mut H,
    hooks: &'a Hooks,
    config: &'a RenderConfig,
}

impl<'a, H: HostAdapter> Reconciler<'a, H> {
    pub fn new(host: &'a mut H, hooks: &'a Hooks, config: &'a RenderConfig) -> Self {
        Self { host, hooks, config }
    }

    /// Apply one attribute to a host node, routing handlers under event
    /// keys to listeners.
    fn set_prop(&mut self, node: &H::Node, key: &str, value: &PropValue) {
        match (self.config.event_name(key), value) {
            (Some(event), PropValue::Handler(handler)) => {
                self.host.remove_attribute(node, key);
                self.host.add_event_listener(node, &event, handler.clone());
            }
            (None, PropValue::Handler(_)) => {
                tracing::warn!(key, "handler under a non-event key skipped");
            }
            // An event key holds either a listener or an attribute, never both.
            (Some(event), _) => {
                self.host.remove_event_listener(node, &event);
                self.host.set_attribute(node, key, value);
            }
            (None, _) => self.host.set_attribute(node, key, value),
        }
    }

    fn remove_prop(&mut self, node: &H::Node, key: &str) {
        if let Some(event) = self.config.event_name(key) {
            self.host.remove_event_listener(node, &event);
        }
        self.host.remove_attribute(node, key);
    }
}
