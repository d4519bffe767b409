//! Resolve - Bring a virtual tree to host shape.
//!
//! Components contribute no host node of their own and fragments splice
//! their children into the parent, so a tree that still contains either
//! does not line up index-for-index with the host tree. Resolving expands
//! every component (running its hooks, depth-first, in document order) and
//! flattens every fragment.
//!
//! Each resolved node remembers the chain of components and fragments that
//! produced it, relative to its host parent:
//!
//! ```text
//! div                      origin: []
//! +- <A/> -> <>p, p</>     origin: [Component(A), Fragment] (both p)
//! +- "text"                origin: []
//! ```
//!
//! Two nodes at the same position with different chains are different
//! nodes, even if their tags match, which keeps component and fragment
//! identity visible to the diff.

use tracing::trace;

use crate::primitives::Attrs;
use crate::state::Hooks;
use crate::types::{ComponentFn, Element, Props, VNode};

// =============================================================================
// Resolved Tree
// =============================================================================

/// One step in the chain a resolved node came through.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    Component(ComponentFn),
    Fragment,
}

/// What a resolved node puts in the host tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedKind {
    Empty,
    Text(String),
    Element {
        tag: String,
        attrs: Attrs,
        children: Vec<ResolvedNode>,
    },
}

/// A host-level node plus its origin chain, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub origin: Vec<Origin>,
    pub kind: ResolvedKind,
}

impl ResolvedNode {
    pub fn children(&self) -> &[ResolvedNode] {
        match &self.kind {
            ResolvedKind::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Plain virtual node for materializing. Origins are dropped; the
    /// result contains no components, so materializing it runs no hooks.
    pub fn to_vnode(&self) -> VNode {
        match &self.kind {
            ResolvedKind::Empty => VNode::Empty,
            ResolvedKind::Text(value) => VNode::Text(value.clone()),
            ResolvedKind::Element { tag, attrs, children } => VNode::Element(Element {
                tag: tag.clone(),
                props: Props::new(attrs.clone(), children.iter().map(ResolvedNode::to_vnode).collect()),
            }),
        }
    }
}

// =============================================================================
// Resolve
// =============================================================================

/// Resolve `node` into the list of host-level nodes it stands for.
pub fn resolve(node: &VNode, hooks: &Hooks) -> Vec<ResolvedNode> {
    let mut out = Vec::new();
    resolve_into(node, hooks, &mut Vec::new(), &mut out);
    out
}

fn resolve_into(node: &VNode, hooks: &Hooks, origin: &mut Vec<Origin>, out: &mut Vec<ResolvedNode>) {
    match node {
        VNode::Empty => out.push(ResolvedNode {
            origin: origin.clone(),
            kind: ResolvedKind::Empty,
        }),
        VNode::Text(value) => out.push(ResolvedNode {
            origin: origin.clone(),
            kind: ResolvedKind::Text(value.clone()),
        }),
        VNode::Element(element) => {
            // Children start a fresh chain under their host parent.
            let mut inner = Vec::new();
            let mut children = Vec::with_capacity(element.props.children.len());
            for child in &element.props.children {
                resolve_into(child, hooks, &mut inner, &mut children);
            }
            out.push(ResolvedNode {
                origin: origin.clone(),
                kind: ResolvedKind::Element {
                    tag: element.tag.clone(),
                    attrs: element.props.attrs.clone(),
                    children,
                },
            });
        }
        VNode::Fragment(children) => {
            origin.push(Origin::Fragment);
            for child in children {
                resolve_into(child, hooks, origin, out);
            }
            origin.pop();
        }
        VNode::Component(component) => {
            trace!(func = ?component.func, "expanding component");
            let output = component.render(hooks);
            origin.push(Origin::Component(component.func.clone()));
            resolve_into(&output, hooks, origin, out);
            origin.pop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
