//! Node constructors - `h`, the `h!` macro, and child flattening.
//!
//! # Example
//!
//! ```ignore
//! use spark_vdom::{h, Attrs};
//!
//! let items = vec!["a", "b"];
//! let list = h!("ul", Attrs::new().with("class", "list"),
//!     items.iter().map(|i| h!("li", Attrs::new(), *i)).collect::<Vec<_>>(),
//!     None::<&str>,
//! );
//! ```

use crate::types::{Component, Element, Props, Tag, VNode};
use super::types::Attrs;

// =============================================================================
// Children
// =============================================================================

/// Anything that can be passed as children.
///
/// Sequences flatten recursively, `None` becomes [`VNode::Empty`] (keeping
/// its sibling position), and `()` contributes nothing.
pub trait IntoChildren {
    fn push_into(self, out: &mut Vec<VNode>);
}

impl IntoChildren for VNode {
    fn push_into(self, out: &mut Vec<VNode>) {
        out.push(self);
    }
}

impl IntoChildren for &VNode {
    fn push_into(self, out: &mut Vec<VNode>) {
        out.push(self.clone());
    }
}

impl IntoChildren for &str {
    fn push_into(self, out: &mut Vec<VNode>) {
        out.push(VNode::Text(self.to_string()));
    }
}

impl IntoChildren for String {
    fn push_into(self, out: &mut Vec<VNode>) {
        out.push(VNode::Text(self));
    }
}

impl IntoChildren for &String {
    fn push_into(self, out: &mut Vec<VNode>) {
        out.push(VNode::Text(self.clone()));
    }
}

macro_rules! number_children {
    ($($ty:ty),*) => {
        $(
            impl IntoChildren for $ty {
                fn push_into(self, out: &mut Vec<VNode>) {
                    out.push(VNode::text(self));
                }
            }
        )*
    };
}

number_children!(i32, i64, u32, u64, usize, f32, f64);

impl IntoChildren for () {
    fn push_into(self, _out: &mut Vec<VNode>) {}
}

impl<T: IntoChildren> IntoChildren for Option<T> {
    fn push_into(self, out: &mut Vec<VNode>) {
        match self {
            Some(child) => child.push_into(out),
            None => out.push(VNode::Empty),
        }
    }
}

impl<T: IntoChildren> IntoChildren for Vec<T> {
    fn push_into(self, out: &mut Vec<VNode>) {
        for child in self {
            child.push_into(out);
        }
    }
}

impl<T: IntoChildren, const N: usize> IntoChildren for [T; N] {
    fn push_into(self, out: &mut Vec<VNode>) {
        for child in self {
            child.push_into(out);
        }
    }
}

impl<T: IntoChildren + Clone> IntoChildren for &[T] {
    fn push_into(self, out: &mut Vec<VNode>) {
        for child in self {
            child.clone().push_into(out);
        }
    }
}

/// Flatten any children argument into an ordered list.
pub fn flatten(children: impl IntoChildren) -> Vec<VNode> {
    let mut out = Vec::new();
    children.push_into(&mut out);
    out
}

// =============================================================================
// Constructors
// =============================================================================

/// Build an element, component, or fragment node.
///
/// Fragments ignore `attrs`; they have no host node to carry them.
pub fn h(tag: impl Into<Tag>, attrs: Attrs, children: impl IntoChildren) -> VNode {
    let children = flatten(children);
    match tag.into() {
        Tag::Element(tag) => VNode::Element(Element {
            tag,
            props: Props::new(attrs, children),
        }),
        Tag::Component(func) => VNode::Component(Component {
            func,
            props: Props::new(attrs, children),
        }),
        Tag::Fragment => VNode::Fragment(children),
    }
}

/// Variadic [`h`]: `h!(tag)`, `h!(tag, attrs)`, `h!(tag, attrs, child, ...)`.
#[macro_export]
macro_rules! h {
    ($tag:expr) => {
        $crate::h($tag, $crate::Attrs::new(), ())
    };
    ($tag:expr, $attrs:expr $(, $child:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut children: ::std::vec::Vec<$crate::VNode> = ::std::vec::Vec::new();
        $( $crate::IntoChildren::push_into($child, &mut children); )*
        $crate::h($tag, $attrs, children)
    }};
}

/// Text node.
pub fn text(value: impl std::fmt::Display) -> VNode {
    VNode::text(value)
}

/// Fragment node.
pub fn fragment(children: impl IntoChildren) -> VNode {
    VNode::Fragment(flatten(children))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Hooks;
    use crate::types::{ComponentFn, Fragment, NodeKind};

    fn label(_: &Hooks, props: &Props) -> VNode {
        h("span", Attrs::new(), props.children().to_vec())
    }

    #[test]
    fn test_full_flatten() {
        let nested = vec![vec![VNode::text("a"), VNode::text("b")], vec![VNode::text("c")]];
        let node = h!("div", Attrs::new(), "start", nested, vec![vec![vec!["deep"]]]);

        let texts: Vec<&VNode> = node.children().iter().collect();
        assert_eq!(texts.len(), 5);
        assert_eq!(node.children()[0], VNode::text("start"));
        assert_eq!(node.children()[3], VNode::text("c"));
        assert_eq!(node.children()[4], VNode::text("deep"));
    }

    #[test]
    fn test_none_keeps_position() {
        let node = h!("p", Attrs::new(), "a", None::<&str>, "b");
        assert_eq!(
            node.children(),
            &[VNode::text("a"), VNode::Empty, VNode::text("b")]
        );
    }

    #[test]
    fn test_unit_contributes_nothing() {
        let node = h("br", Attrs::new(), ());
        assert!(node.children().is_empty());
        assert_eq!(h!("br"), node);
    }

    #[test]
    fn test_tags() {
        let el = h("div", Attrs::new().with("id", "x"), 5);
        match &el {
            VNode::Element(e) => {
                assert_eq!(e.tag, "div");
                assert_eq!(e.props.get_text("id").as_deref(), Some("x"));
                assert_eq!(e.props.children, vec![VNode::text("5")]);
            }
            other => panic!("expected element, got {other:?}"),
        }

        let frag = h(Fragment, Attrs::new(), ["a", "b"]);
        assert_eq!(frag, fragment(["a", "b"]));

        let comp = h(ComponentFn::new(label), Attrs::new(), "hi");
        assert_eq!(comp.kind(), NodeKind::Component);
        assert_eq!(comp.children(), &[VNode::text("hi")]);
    }
}
