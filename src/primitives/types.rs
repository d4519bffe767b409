//! Primitive types - Attribute values and event callbacks.
//!
//! These types define what an element or component can carry as props.
//! Values are compared shallowly: scalars by value, handlers by identity.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Reserved props key holding the child list. Never treated as an attribute.
pub const CHILDREN_KEY: &str = "children";

// =============================================================================
// Events
// =============================================================================

/// Event delivered to a registered handler.
#[derive(Debug)]
pub struct Event {
    name: String,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_prevented: Cell::new(false),
        }
    }

    /// Event name without the handler prefix (e.g. `"click"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suppress the host's default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Event handler callback.
///
/// Using Rc<dyn Fn> so the same handler can be held by the virtual tree,
/// the patch, and the host node at once. Equality is pointer identity: a
/// handler rebuilt on every render counts as changed on every render.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn same(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    /// String form written to the host. Handlers have none.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            PropValue::Text(s) => Some(s.clone()),
            PropValue::Number(n) => Some(n.to_string()),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Handler(_) => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<usize> for PropValue {
    fn from(value: usize) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        PropValue::Handler(handler)
    }
}

// =============================================================================
// Attrs
// =============================================================================

/// Ordered attribute map with unique keys.
///
/// Iteration order is insertion order; re-inserting a key keeps its
/// original position. The diff emits patches in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(IndexMap<String, PropValue>);

impl Attrs {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder form of [`Attrs::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Register a handler under `on{event}`.
    pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.with(format!("on{event}"), EventHandler::new(handler))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

// =============================================================================
// Tests
// =============================================================================
