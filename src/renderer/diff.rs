//! Diff - Compute the patch tree between two virtual trees.
//!
//! Pure functions: nothing here touches a host tree or runs a component.
//!
//! # Algorithm
//!
//! 1. Missing old node: `Create`. Missing new node: `Remove`.
//! 2. Different kind, different text, or different tag: `Replace`.
//! 3. Equal primitives (text, empty): no patch.
//! 4. Otherwise: `Update` with attribute patches and one child patch per
//!    index up to the longer child list.
//!
//! [`diff_resolved`] applies the same rules to resolved trees, with one
//! extra: nodes whose origin chains differ are replaced.

use super::resolve::{ResolvedKind, ResolvedNode};
use super::{Patch, PropPatch};
use crate::primitives::{Attrs, CHILDREN_KEY};
use crate::types::VNode;

/// Patch turning `old` into `new` at one position.
pub fn diff(old: Option<&VNode>, new: Option<&VNode>) -> Option<Patch> {
    let (old, new) = match (old, new) {
        (None, None) => return None,
        (None, Some(new)) => return Some(Patch::Create(new.clone())),
        (Some(_), None) => return Some(Patch::Remove),
        (Some(old), Some(new)) => (old, new),
    };

    if changed(old, new) {
        return Some(Patch::Replace(new.clone()));
    }

    if new.is_primitive() {
        return None;
    }

    let empty = Attrs::new();
    Some(Patch::Update {
        props: diff_props(old.attrs().unwrap_or(&empty), new.attrs().unwrap_or(&empty)),
        children: diff_children(old.children(), new.children()),
    })
}

/// Whether `new` cannot be reached from `old` by an in-place update.
///
/// Element tags compare by value, component functions by identity, and any
/// two fragments match.
pub fn changed(old: &VNode, new: &VNode) -> bool {
    match (old, new) {
        (VNode::Empty, VNode::Empty) => false,
        (VNode::Text(a), VNode::Text(b)) => a != b,
        (VNode::Element(a), VNode::Element(b)) => a.tag != b.tag,
        (VNode::Component(a), VNode::Component(b)) => !a.func.same(&b.func),
        (VNode::Fragment(_), VNode::Fragment(_)) => false,
        _ => true,
    }
}

/// Attribute patches: sets in `new` order, then removals in `old` order.
///
/// Values compare shallowly, so a handler closure rebuilt each render is
/// set again each render.
pub fn diff_props(old: &Attrs, new: &Attrs) -> Vec<PropPatch> {
    let mut patches = Vec::new();

    for (key, value) in new.iter() {
        if key == CHILDREN_KEY {
            continue;
        }
        if old.get(key) != Some(value) {
            patches.push(PropPatch::Set(key.to_string(), value.clone()));
        }
    }

    for (key, _) in old.iter() {
        if key == CHILDREN_KEY {
            continue;
        }
        if !new.contains_key(key) {
            patches.push(PropPatch::Remove(key.to_string()));
        }
    }

    patches
}

/// Positional child patches, one per index of the longer list.
pub fn diff_children(old: &[VNode], new: &[VNode]) -> Vec<Option<Patch>> {
    let len = old.len().max(new.len());
    (0..len).map(|i| diff(old.get(i), new.get(i))).collect()
}

// =============================================================================
// Resolved Trees
// =============================================================================

/// Patch turning resolved `old` into resolved `new` at one host position.
///
/// A node produced by another component (or moved into or out of a
/// fragment) is a different node, so it is replaced even when its tag
/// matches.
pub fn diff_resolved(old: Option<&ResolvedNode>, new: Option<&ResolvedNode>) -> Option<Patch> {
    let (old, new) = match (old, new) {
        (None, None) => return None,
        (None, Some(new)) => return Some(Patch::Create(new.to_vnode())),
        (Some(_), None) => return Some(Patch::Remove),
        (Some(old), Some(new)) => (old, new),
    };

    if old.origin != new.origin {
        return Some(Patch::Replace(new.to_vnode()));
    }

    match (&old.kind, &new.kind) {
        (ResolvedKind::Empty, ResolvedKind::Empty) => None,
        (ResolvedKind::Text(a), ResolvedKind::Text(b)) if a == b => None,
        (
            ResolvedKind::Element { tag: old_tag, attrs: old_attrs, children: old_children },
            ResolvedKind::Element { tag: new_tag, attrs: new_attrs, children: new_children },
        ) if old_tag == new_tag => Some(Patch::Update {
            props: diff_props(old_attrs, new_attrs),
            children: diff_resolved_children(old_children, new_children),
        }),
        _ => Some(Patch::Replace(new.to_vnode())),
    }
}

/// Positional child patches over resolved lists.
pub fn diff_resolved_children(old: &[ResolvedNode], new: &[ResolvedNode]) -> Vec<Option<Patch>> {
    let len = old.len().max(new.len());
    (0..len).map(|i| diff_resolved(old.get(i), new.get(i))).collect()
}

// =============================================================================
// Tests
// =============================================================================
