//! Router - Path-based component selection.
//!
//! Routes are tried in registration order against the current
//! [`History`] location; the first match wins.
//!
//! # Patterns
//!
//! - `/users/:id` - a segment starting with `:` captures one path segment,
//!   handed to the component as the `id` attribute
//! - `/about` - every other segment must match literally
//! - `*` - catch-all, used when no other route matches
//!
//! Without a catch-all, unmatched paths render a built-in
//! `div.not-found` element.
//!
//! # Example
//!
//! ```ignore
//! let router = Router::new()
//!     .route("/", ComponentFn::new(home))?
//!     .route("/users/:id", ComponentFn::new(user))?
//!     .route("*", ComponentFn::new(missing))?;
//!
//! let handle = mount(doc, root, move |hooks| router.view(&history, hooks), RenderConfig::default());
//! ```

use regex::Regex;
use tracing::{debug, trace};

use super::element::{IntoChildren, flatten, h};
use super::types::Attrs;
use crate::error::RouteError;
use crate::state::{History, Hooks};
use crate::types::{Component, ComponentFn, Props, VNode};

/// Pattern that matches every path.
pub const CATCH_ALL: &str = "*";

/// Text of the built-in not-found element.
pub const NOT_FOUND_TEXT: &str = "404 - page not found";

// =============================================================================
// Route
// =============================================================================

/// A compiled path pattern bound to a component.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    regex: Regex,
    keys: Vec<String>,
    component: ComponentFn,
}

impl Route {
    /// Compile `pattern`.
    pub fn new(pattern: impl Into<String>, component: ComponentFn) -> Result<Self, RouteError> {
        let pattern = pattern.into();
        let mut keys: Vec<String> = Vec::new();
        let mut source = String::from("^");

        for (i, segment) in pattern.split('/').enumerate() {
            if i > 0 {
                source.push('/');
            }
            match segment.strip_prefix(':').filter(|name| !name.is_empty()) {
                Some(name) => {
                    if keys.iter().any(|k| k == name) {
                        return Err(RouteError::DuplicateParam {
                            pattern: pattern.clone(),
                            name: name.to_string(),
                        });
                    }
                    keys.push(name.to_string());
                    source.push_str("([^/]+)");
                }
                None => source.push_str(&regex::escape(segment)),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| RouteError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        Ok(Self {
            pattern,
            regex,
            keys,
            component,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parameter names in the order they appear.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn component(&self) -> &ComponentFn {
        &self.component
    }

    /// Extracted parameters if `path` matches.
    pub fn matches(&self, path: &str) -> Option<Attrs> {
        let captures = self.regex.captures(path)?;
        let mut params = Attrs::new();
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(value) = captures.get(i + 1) {
                params.insert(key.as_str(), value.as_str());
            }
        }
        Some(params)
    }
}

// =============================================================================
// Router
// =============================================================================

/// Ordered route table plus an optional catch-all.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    not_found: Option<ComponentFn>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. `*` replaces the catch-all.
    pub fn route(mut self, pattern: &str, component: ComponentFn) -> Result<Self, RouteError> {
        if pattern == CATCH_ALL {
            self.not_found = Some(component);
        } else {
            self.routes.push(Route::new(pattern, component)?);
        }
        Ok(self)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Node for `path`: the matching route's component with its parameters
    /// as attributes, else the catch-all, else the built-in not-found
    /// element.
    pub fn resolve(&self, path: &str) -> VNode {
        let path = if path.is_empty() { "/" } else { path };

        for route in &self.routes {
            if let Some(params) = route.matches(path) {
                trace!(path, pattern = route.pattern(), "route matched");
                return VNode::Component(Component {
                    func: route.component.clone(),
                    props: Props::new(params, Vec::new()),
                });
            }
        }

        debug!(path, "no route matched");
        match &self.not_found {
            Some(func) => VNode::Component(Component {
                func: func.clone(),
                props: Props::default(),
            }),
            None => h("div", Attrs::new().with("class", "not-found"), NOT_FOUND_TEXT),
        }
    }

    /// Render the current location of `history`.
    ///
    /// The first call subscribes `hooks` to navigation, so `navigate`,
    /// `back` and `forward` re-render the root.
    pub fn view(&self, history: &History, hooks: &Hooks) -> VNode {
        if history.listen(hooks) {
            debug!("router subscribed to history");
        }
        self.resolve(&history.location())
    }
}

// =============================================================================
// Link
// =============================================================================

/// Anchor that navigates `history` on click instead of following `href`.
pub fn link(history: &History, to: &str, class: Option<&str>, children: impl IntoChildren) -> VNode {
    let target = to.to_string();
    let history = history.clone();

    let mut attrs = Attrs::new().with("href", to);
    if let Some(class) = class {
        attrs.insert("class", class);
    }
    let attrs = attrs.on("click", move |event| {
        event.prevent_default();
        history.navigate(target.as_str());
    });

    h("a", attrs, flatten(children))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Event, PropValue};

    fn home(_: &Hooks, _: &Props) -> VNode {
        VNode::text("home")
    }

    fn user(_: &Hooks, props: &Props) -> VNode {
        VNode::text(format!("user {}", props.get_text("id").unwrap_or_default()))
    }

    fn missing(_: &Hooks, _: &Props) -> VNode {
        VNode::text("missing")
    }

    fn router() -> Router {
        Router::new()
            .route("/", ComponentFn::new(home))
            .and_then(|r| r.route("/users/:id", ComponentFn::new(user)))
            .unwrap()
    }

    fn render(node: &VNode) -> VNode {
        match node {
            VNode::Component(c) => c.render(&Hooks::new()),
            other => other.clone(),
        }
    }

    #[test]
    fn test_params_extracted() {
        let route = Route::new("/posts/:year/:slug", ComponentFn::new(home)).unwrap();
        let params = route.matches("/posts/2024/hello").unwrap();
        assert_eq!(params.get("year"), Some(&PropValue::from("2024")));
        assert_eq!(params.get("slug"), Some(&PropValue::from("hello")));
        assert_eq!(route.keys(), &["year".to_string(), "slug".to_string()]);

        assert!(route.matches("/posts/2024").is_none());
        assert!(route.matches("/posts/2024/hello/more").is_none());
    }

    #[test]
    fn test_literal_segments_are_escaped() {
        let route = Route::new("/a.b", ComponentFn::new(home)).unwrap();
        assert!(route.matches("/a.b").is_some());
        assert!(route.matches("/axb").is_none());
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let err = Route::new("/:id/:id", ComponentFn::new(home)).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_resolve_first_match() {
        let router = router();
        assert_eq!(render(&router.resolve("/")), VNode::text("home"));
        assert_eq!(render(&router.resolve("")), VNode::text("home"));
        assert_eq!(render(&router.resolve("/users/42")), VNode::text("user 42"));
    }

    #[test]
    fn test_default_not_found() {
        let node = router().resolve("/nowhere");
        let VNode::Element(el) = &node else {
            panic!("expected element, got {node:?}");
        };
        assert_eq!(el.tag, "div");
        assert_eq!(el.props.get_text("class").as_deref(), Some("not-found"));
        assert_eq!(el.props.children(), &[VNode::text(NOT_FOUND_TEXT)]);
    }

    #[test]
    fn test_catch_all() {
        let router = router().route("*", ComponentFn::new(missing)).unwrap();
        assert_eq!(router.routes().len(), 2);
        assert_eq!(render(&router.resolve("/nowhere")), VNode::text("missing"));
    }

    #[test]
    fn test_view_subscribes_once() {
        let history = History::new("/users/7");
        let hooks = Hooks::new();
        let router = router();

        assert_eq!(render(&router.view(&history, &hooks)), VNode::text("user 7"));
        assert!(!history.listen(&Hooks::new()));
    }

    #[test]
    fn test_link_navigates() {
        let history = History::new("/");
        let node = link(&history, "/users/1", Some("nav"), "profile");
        let VNode::Element(el) = &node else {
            panic!("expected element");
        };
        assert_eq!(el.tag, "a");
        assert_eq!(el.props.get_text("href").as_deref(), Some("/users/1"));
        assert_eq!(el.props.get_text("class").as_deref(), Some("nav"));
        assert_eq!(el.props.children(), &[VNode::text("profile")]);

        let handler = el.props.get("onclick").and_then(PropValue::as_handler).unwrap();
        let event = Event::new("click");
        handler.call(&event);
        assert!(event.default_prevented());
        assert_eq!(history.location(), "/users/1");
    }

    #[test]
    fn test_link_without_class() {
        let node = link(&History::default(), "/", None, ());
        assert!(node.attrs().is_some_and(|a| !a.contains_key("class")));
    }
}
