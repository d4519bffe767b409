//! Host tree adapter.
//!
//! The reconciler never touches a presentation medium directly. Everything
//! it does to the live tree goes through [`HostAdapter`], which owns the
//! host nodes and decides their lifecycle.
//!
//! [`MemoryDocument`] is the bundled adapter: a headless, arena-backed
//! document that follows browser DOM semantics closely enough for the
//! reconciler (fragments splice into their parent on insertion, one
//! listener per event name per node).

mod memory;

pub use memory::*;

use crate::primitives::{EventHandler, PropValue};

/// Primitives the reconciler needs from a presentation layer.
pub trait HostAdapter {
    /// Opaque handle to a live node.
    type Node: Clone;

    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn create_text(&mut self, value: &str) -> Self::Node;

    /// A grouping container whose children move into the parent when it is
    /// appended or substituted.
    fn create_fragment(&mut self) -> Self::Node;

    fn set_attribute(&mut self, node: &Self::Node, key: &str, value: &PropValue);

    fn remove_attribute(&mut self, node: &Self::Node, key: &str);

    /// Subscribe `handler` to `event`. Re-adding for the same event replaces
    /// the previous subscription.
    fn add_event_listener(&mut self, node: &Self::Node, event: &str, handler: EventHandler);

    fn remove_event_listener(&mut self, node: &Self::Node, event: &str);

    fn append_child(&mut self, parent: &Self::Node, child: Self::Node);

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn replace_child(&mut self, parent: &Self::Node, old: &Self::Node, new: Self::Node);

    /// The child currently at `index`, if any.
    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Remove every child of `container`.
    fn clear_contents(&mut self, container: &Self::Node);
}
