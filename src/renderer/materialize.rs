//! Materialize - Build a fresh host subtree from a virtual node.
//!
//! Only the new subtree is mutated; nothing here looks at an existing host
//! tree except [`Reconciler::replace_children`], which clears its container
//! first.

use tracing::trace;

use super::Reconciler;
use crate::host::HostAdapter;
use crate::primitives::CHILDREN_KEY;
use crate::types::VNode;

impl<H: HostAdapter> Reconciler<'_, H> {
    /// Create the host nodes for `node`.
    ///
    /// - `Empty` becomes an empty text node, keeping sibling positions.
    /// - Components are invoked and their output materialized in their
    ///   place; they own no host node.
    /// - Fragments become a fragment container holding their children.
    pub fn materialize(&mut self, node: &VNode) -> H::Node {
        match node {
            VNode::Empty => self.host.create_text(""),
            VNode::Text(value) => self.host.create_text(value),
            VNode::Component(component) => {
                trace!(func = ?component.func, "materializing component");
                let output = component.render(self.hooks);
                self.materialize(&output)
            }
            VNode::Fragment(children) => {
                let fragment = self.host.create_fragment();
                for child in children {
                    let host_child = self.materialize(child);
                    self.host.append_child(&fragment, host_child);
                }
                fragment
            }
            VNode::Element(element) => {
                let host_node = self.host.create_element(&element.tag);
                for (key, value) in element.props.attrs.iter() {
                    if key == CHILDREN_KEY {
                        continue;
                    }
                    self.set_prop(&host_node, key, value);
                }
                for child in &element.props.children {
                    let host_child = self.materialize(child);
                    self.host.append_child(&host_node, host_child);
                }
                host_node
            }
        }
    }

    /// Clear `container` and fill it with `nodes`, in order.
    pub fn replace_children(&mut self, container: &H::Node, nodes: &[VNode]) {
        self.host.clear_contents(container);
        for node in nodes {
            let host_node = self.materialize(node);
            self.host.append_child(container, host_node);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::h;
    use crate::host::{HostAdapter, MemoryDocument};
    use crate::pipeline::RenderConfig;
    use crate::primitives::{Attrs, EventHandler};
    use crate::renderer::Reconciler;
    use crate::state::Hooks;
    use crate::types::{ComponentFn, Fragment, Props, VNode};

    fn badge(_: &Hooks, props: &Props) -> VNode {
        h!(
            "span",
            Attrs::new().with("class", props.get_text("kind").unwrap_or_default()),
            props.children().to_vec()
        )
    }

    fn build(node: &VNode) -> (MemoryDocument, String) {
        let mut doc = MemoryDocument::new();
        let hooks = Hooks::new();
        let config = RenderConfig::default();
        let root = doc.create_element("main");
        let host_node = Reconciler::new(&mut doc, &hooks, &config).materialize(node);
        doc.append_child(&root, host_node);
        let html = doc.inner_html(root);
        (doc, html)
    }

    #[test]
    fn test_element_with_attributes() {
        let node = h!("a", Attrs::new().with("href", "/x").with("tabindex", 2), "go");
        let (_, html) = build(&node);
        assert_eq!(html, "<a href=\"/x\" tabindex=\"2\">go</a>");
    }

    #[test]
    fn test_empty_placeholder() {
        let node = h!("p", Attrs::new(), "a", None::<&str>, "b");
        let mut doc = MemoryDocument::new();
        let hooks = Hooks::new();
        let config = RenderConfig::default();
        let p = Reconciler::new(&mut doc, &hooks, &config).materialize(&node);

        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.text(doc.children(p)[1]), Some(""));
    }

    #[test]
    fn test_component_is_inlined() {
        let node = h!(
            "div",
            Attrs::new(),
            h!(ComponentFn::new(badge), Attrs::new().with("kind", "new"), "hot")
        );
        let (_, html) = build(&node);
        assert_eq!(html, "<div><span class=\"new\">hot</span></div>");
    }

    #[test]
    fn test_fragment_contributes_no_node() {
        let node = h!("ul", Attrs::new(), h!(Fragment, Attrs::new(), h!("li", Attrs::new(), 1), h!("li", Attrs::new(), 2)));
        let (_, html) = build(&node);
        assert_eq!(html, "<ul><li>1</li><li>2</li></ul>");
    }

    #[test]
    fn test_handlers_become_listeners() {
        let clicks = Rc::new(Cell::new(0));
        let inner = clicks.clone();
        let node = h!(
            "button",
            Attrs::new()
                .on("Click", move |_| inner.set(inner.get() + 1))
                .with("title", "press"),
            "+"
        );

        let mut doc = MemoryDocument::new();
        let hooks = Hooks::new();
        let config = RenderConfig::default();
        let button = Reconciler::new(&mut doc, &hooks, &config).materialize(&node);

        assert_eq!(doc.attribute(button, "onClick"), None);
        assert_eq!(doc.attribute(button, "title"), Some("press"));
        doc.dispatch(button, "click");
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_handler_under_plain_key_is_skipped() {
        let node = h!("div", Attrs::new().with("data-fn", EventHandler::new(|_| {})));
        let (doc, html) = build(&node);
        assert_eq!(html, "<div></div>");
        drop(doc);
    }

    #[test]
    fn test_replace_children() {
        let mut doc = MemoryDocument::new();
        let hooks = Hooks::new();
        let config = RenderConfig::default();
        let root = doc.create_element("main");
        let stale = doc.create_text("stale");
        doc.append_child(&root, stale);

        Reconciler::new(&mut doc, &hooks, &config)
            .replace_children(&root, &[VNode::text("a"), h!("b")]);

        assert_eq!(doc.inner_html(root), "a<b></b>");
        assert!(!doc.contains(stale));
    }
}
