//! Core types for spark-vdom.
//!
//! The virtual node model is the description language for a UI tree.
//! Nodes are plain immutable values: every render builds a brand-new tree
//! and the previous one is only ever read (by the diff) and dropped.

use std::fmt;
use std::rc::Rc;

use crate::primitives::{Attrs, PropValue};
use crate::state::Hooks;

// =============================================================================
// Props
// =============================================================================

/// Attribute map plus the reserved `children` entry.
///
/// Elements and components share this shape. The component function
/// receives it as its properties mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    pub attrs: Attrs,
    pub children: Vec<VNode>,
}

impl Props {
    /// Create props from attributes and an already flattened child list.
    pub fn new(attrs: Attrs, children: Vec<VNode>) -> Self {
        Self { attrs, children }
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.attrs.get(key)
    }

    /// Look up an attribute as text (numbers and bools are formatted).
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.attrs.get(key).and_then(PropValue::to_attribute)
    }

    /// The ordered children passed to this node.
    pub fn children(&self) -> &[VNode] {
        &self.children
    }
}

// =============================================================================
// Component Functions
// =============================================================================

type SharedRender = Rc<dyn Fn(&Hooks, &Props) -> VNode>;

/// Plain function signature for components.
pub type RenderFn = fn(&Hooks, &Props) -> VNode;

/// A component function reference.
///
/// Identity matters: the reconciler treats two components as the same tag
/// only when they point at the same function. Plain `fn` items compare by
/// address, closures by `Rc` identity, so a closure must be created once and
/// cloned to keep its identity across renders.
#[derive(Clone)]
pub enum ComponentFn {
    Static(RenderFn),
    Shared(SharedRender),
}

impl ComponentFn {
    /// Wrap a plain function.
    pub fn new(render: RenderFn) -> Self {
        ComponentFn::Static(render)
    }

    /// Wrap a closure. Clone the result to reuse the same identity.
    pub fn shared(render: impl Fn(&Hooks, &Props) -> VNode + 'static) -> Self {
        ComponentFn::Shared(Rc::new(render))
    }

    /// Invoke the component.
    pub fn call(&self, hooks: &Hooks, props: &Props) -> VNode {
        match self {
            ComponentFn::Static(f) => f(hooks, props),
            ComponentFn::Shared(f) => f(hooks, props),
        }
    }

    /// Reference identity.
    pub fn same(&self, other: &ComponentFn) -> bool {
        match (self, other) {
            (ComponentFn::Static(a), ComponentFn::Static(b)) => std::ptr::fn_addr_eq(*a, *b),
            (ComponentFn::Shared(a), ComponentFn::Shared(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for ComponentFn {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for ComponentFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentFn::Static(func) => write!(f, "ComponentFn::Static({:p})", *func as *const ()),
            ComponentFn::Shared(func) => write!(f, "ComponentFn::Shared({:p})", Rc::as_ptr(func) as *const ()),
        }
    }
}

impl From<RenderFn> for ComponentFn {
    fn from(render: RenderFn) -> Self {
        ComponentFn::Static(render)
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Marker for tag-less grouping: `h(Fragment, Attrs::new(), children)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fragment;

/// What `h` can build: an element, a component, or a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Element(String),
    Component(ComponentFn),
    Fragment,
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Tag::Element(tag.to_string())
    }
}

impl From<String> for Tag {
    fn from(tag: String) -> Self {
        Tag::Element(tag)
    }
}

impl From<ComponentFn> for Tag {
    fn from(component: ComponentFn) -> Self {
        Tag::Component(component)
    }
}

impl From<RenderFn> for Tag {
    fn from(render: RenderFn) -> Self {
        Tag::Component(ComponentFn::Static(render))
    }
}

impl From<Fragment> for Tag {
    fn from(_: Fragment) -> Self {
        Tag::Fragment
    }
}

// =============================================================================
// Virtual Nodes
// =============================================================================

/// A host element description.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub props: Props,
}

/// A function component invocation, not yet expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub func: ComponentFn,
    pub props: Props,
}

impl Component {
    /// Run the component function once.
    pub fn render(&self, hooks: &Hooks) -> VNode {
        self.func.call(hooks, &self.props)
    }
}

/// A virtual node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VNode {
    /// Placeholder for an absent child (`None`). Materializes to an empty
    /// text node so siblings keep their positions.
    #[default]
    Empty,
    Text(String),
    Element(Element),
    Fragment(Vec<VNode>),
    Component(Component),
}

/// Discriminant of a [`VNode`], used by the diff to detect kind changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Empty,
    Text,
    Element,
    Fragment,
    Component,
}

impl VNode {
    /// Text node from anything displayable.
    pub fn text(value: impl fmt::Display) -> Self {
        VNode::Text(value.to_string())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            VNode::Empty => NodeKind::Empty,
            VNode::Text(_) => NodeKind::Text,
            VNode::Element(_) => NodeKind::Element,
            VNode::Fragment(_) => NodeKind::Fragment,
            VNode::Component(_) => NodeKind::Component,
        }
    }

    /// Empty and text nodes carry no props and no children.
    pub fn is_primitive(&self) -> bool {
        matches!(self, VNode::Empty | VNode::Text(_))
    }

    /// Attributes of a tagged node (empty for primitives and fragments).
    pub fn attrs(&self) -> Option<&Attrs> {
        match self {
            VNode::Element(el) => Some(&el.props.attrs),
            VNode::Component(c) => Some(&c.props.attrs),
            _ => None,
        }
    }

    /// Children of a tagged node (empty for primitives).
    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(el) => &el.props.children,
            VNode::Component(c) => &c.props.children,
            VNode::Fragment(children) => children,
            VNode::Empty | VNode::Text(_) => &[],
        }
    }
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<String> for VNode {
    fn from(value: String) -> Self {
        VNode::Text(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
