//! Mount API - Bind an app function to a host container.
//!
//! Mounting wires the three runtime pieces together:
//!
//! ```text
//! app(&hooks) -> VNode -> RenderRoot::render -> host container
//!      ^                                              |
//!      +------ SetState / History -> request_render --+
//! ```
//!
//! The hooks runtime owns the re-render callback; the callback holds only a
//! weak reference to the root, so dropping the [`MountHandle`] tears the
//! whole thing down.
//!
//! # Example
//!
//! ```ignore
//! use spark_vdom::{mount, h, Attrs, MemoryDocument, HostAdapter, RenderConfig};
//!
//! let mut doc = MemoryDocument::new();
//! let root = doc.create_element("main");
//!
//! let handle = mount(doc, root, |hooks| {
//!     let (count, set_count) = hooks.use_state(0);
//!     h!("button", Attrs::new().on("click", move |_| set_count.update(|n| n + 1)), count)
//! }, RenderConfig::default());
//!
//! assert_eq!(handle.html(), "<button>0</button>");
//! handle.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error};

use super::{RenderConfig, RenderRoot};
use crate::host::{HostAdapter, MemoryDocument, Mutation, NodeId, Snapshot};
use crate::primitives::Event;
use crate::state::Hooks;
use crate::types::VNode;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`].
///
/// Dropping it unregisters the re-render callback; [`MountHandle::unmount`]
/// additionally empties the container and drops all hook state.
pub struct MountHandle<H: HostAdapter> {
    root: Rc<RefCell<RenderRoot<H>>>,
    hooks: Hooks,
}

impl<H: HostAdapter> MountHandle<H> {
    /// The root's hooks runtime.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Render passes run so far.
    pub fn passes(&self) -> usize {
        self.root.borrow().passes()
    }

    /// Re-render from outside the app (e.g. after external data changed).
    pub fn request_render(&self) {
        self.hooks.request_render();
    }

    /// Read access to the host.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(self.root.borrow().host())
    }

    /// Write access to the host. Changes made here are invisible to the
    /// diff; call [`MountHandle::invalidate`] if they touch the container.
    pub fn with_host_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(self.root.borrow_mut().host_mut())
    }

    /// Make the next pass a full rebuild.
    pub fn invalidate(&self) {
        self.root.borrow_mut().invalidate();
    }

    pub fn container(&self) -> H::Node {
        self.root.borrow().container().clone()
    }

    /// Stop rendering, empty the container and drop all hook state.
    pub fn unmount(self) {
        self.hooks.clear_rerender();
        self.root.borrow_mut().clear();
        self.hooks.clear();
        debug!("unmounted");
    }
}

impl<H: HostAdapter> Drop for MountHandle<H> {
    fn drop(&mut self) {
        self.hooks.clear_rerender();
    }
}

impl MountHandle<MemoryDocument> {
    /// Fire `event` at `node`, outside any borrow of the document so the
    /// handler is free to trigger renders.
    pub fn dispatch(&self, node: NodeId, event: &str) -> Option<Event> {
        let handler = self.root.borrow().host().listener(node, event)?;
        let event = Event::new(event);
        handler.call(&event);
        Some(event)
    }

    /// First element with `tag` inside the container.
    pub fn find(&self, tag: &str) -> Option<NodeId> {
        let root = self.root.borrow();
        root.host().find(*root.container(), tag)
    }

    /// Drain the document's mutation log. Empty unless the document was
    /// created with [`MemoryDocument::with_mutation_log`].
    pub fn take_mutations(&self) -> Vec<Mutation> {
        self.root.borrow_mut().host_mut().take_mutations()
    }

    /// Container contents as HTML.
    pub fn html(&self) -> String {
        let root = self.root.borrow();
        root.host().inner_html(*root.container())
    }

    /// Container contents as a structural snapshot.
    pub fn snapshot(&self) -> Vec<Snapshot> {
        let root = self.root.borrow();
        root.host().snapshot_children(*root.container())
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount `app` into `container` and run the first render.
///
/// Every pass resets the hook cursor, calls `app` and renders the result.
/// A failed pass is logged and leaves the root invalidated, so the next
/// pass rebuilds the container.
pub fn mount<H, F>(host: H, container: H::Node, app: F, config: RenderConfig) -> MountHandle<H>
where
    H: HostAdapter + 'static,
    H::Node: 'static,
    F: Fn(&Hooks) -> VNode + 'static,
{
    let hooks = Hooks::new();
    hooks.set_pass_limit(config.max_passes);

    let root = Rc::new(RefCell::new(RenderRoot::new(host, container, hooks.clone(), config)));
    let weak = Rc::downgrade(&root);

    hooks.set_rerender(move || {
        let Some(root) = weak.upgrade() else { return };
        // Not captured: the runtime owns this closure.
        let hooks = root.borrow().hooks().clone();

        hooks.reset_hooks();
        let tree = app(&hooks);

        let result = root.borrow_mut().render(&tree);
        if let Err(err) = result {
            error!(%err, "render pass failed; next pass rebuilds the container");
        }
    });

    debug!("mounted");
    hooks.request_render();

    MountHandle { root, hooks }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::h;
    use crate::primitives::Attrs;

    fn doc() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let root = doc.create_element("main");
        (doc, root)
    }

    #[test]
    fn test_mount_renders_immediately() {
        let (doc, root) = doc();
        let handle = mount(doc, root, |_| h!("p", Attrs::new(), "hi"), RenderConfig::default());
        assert_eq!(handle.html(), "<p>hi</p>");
        assert_eq!(handle.passes(), 1);
        assert_eq!(handle.container(), root);
    }

    #[test]
    fn test_click_updates_state() {
        let (doc, root) = doc();
        let handle = mount(
            doc,
            root,
            |hooks| {
                let (count, set_count) = hooks.use_state(0);
                h!("button", Attrs::new().on("click", move |_| set_count.update(|n| n + 1)), count)
            },
            RenderConfig::default(),
        );

        let button = handle.find("button").unwrap();
        handle.dispatch(button, "click");
        handle.dispatch(button, "click");

        assert_eq!(handle.html(), "<button>2</button>");
        assert_eq!(handle.passes(), 3);
        assert_eq!(handle.find("button"), Some(button));
    }

    #[test]
    fn test_external_request_render() {
        let (doc, root) = doc();
        let source = Rc::new(Cell::new(1));
        let read = source.clone();
        let handle = mount(doc, root, move |_| VNode::text(read.get()), RenderConfig::default());

        source.set(5);
        handle.request_render();
        assert_eq!(handle.html(), "5");
    }

    #[test]
    fn test_pass_limit() {
        let (doc, root) = doc();
        let config = RenderConfig::new().with_max_passes(3);
        let handle = mount(
            doc,
            root,
            |hooks| {
                let (n, set_n) = hooks.use_state(0);
                // Never settles.
                set_n.set(n + 1);
                VNode::text(n)
            },
            config,
        );

        assert_eq!(handle.passes(), 3);
        assert_eq!(handle.hooks().pending(), 0);
    }

    #[test]
    fn test_unmount_clears() {
        let (doc, root) = doc();
        let handle = mount(
            doc,
            root,
            |hooks| {
                let (v, _) = hooks.use_state("x");
                VNode::text(v)
            },
            RenderConfig::default(),
        );
        let hooks = handle.hooks().clone();
        assert_eq!(hooks.slot_count(), 1);

        handle.unmount();

        assert_eq!(hooks.slot_count(), 0);
        assert!(hooks.flags().is_empty());
    }

    #[test]
    fn test_external_host_change_needs_invalidate() {
        let (doc, root) = doc();
        let handle = mount(doc, root, |_| h!("p", Attrs::new(), "x"), RenderConfig::default());

        handle.with_host_mut(|doc| doc.clear_contents(&root));
        handle.invalidate();
        handle.request_render();

        assert_eq!(handle.html(), "<p>x</p>");
        assert_eq!(handle.with_host(|doc| doc.children(root).len()), 1);
    }

    #[test]
    fn test_drop_breaks_cycle() {
        let (doc, root) = doc();
        let handle = mount(doc, root, |_| VNode::text("x"), RenderConfig::default());
        let hooks = handle.hooks().clone();
        drop(handle);

        assert!(!hooks.flags().contains(crate::state::RenderFlags::MOUNTED));
        hooks.request_render();
        assert_eq!(hooks.pending(), 0);
    }

    #[test]
    fn test_mutation_log_stays_bounded() {
        let (doc, root) = doc();
        let handle = mount(
            doc,
            root,
            |hooks| {
                let (n, set_n) = hooks.use_state(0);
                h!("button", Attrs::new().on("click", move |_| set_n.update(|v| v + 1)), n)
            },
            RenderConfig::default(),
        );

        let button = handle.find("button").unwrap();
        for _ in 0..50 {
            handle.dispatch(button, "click");
        }
        assert_eq!(handle.html(), "<button>50</button>");
        assert!(handle.take_mutations().is_empty());
        assert!(handle.with_host(|doc| doc.mutations().is_empty()));
    }

    #[test]
    fn test_take_mutations_drains() {
        let mut doc = MemoryDocument::with_mutation_log();
        let root = doc.create_element("main");
        let handle = mount(doc, root, |_| h!("p"), RenderConfig::default());

        assert!(!handle.take_mutations().is_empty());
        handle.request_render();
        assert!(handle.take_mutations().is_empty());
    }
}
