use std::cell::RefCell;
use std::rc::Rc;

use spark_vdom::*;

fn document() -> (MemoryDocument, NodeId) {
    let mut doc = MemoryDocument::with_mutation_log();
    let root = doc.create_element("main");
    (doc, root)
}

fn counter(hooks: &Hooks, props: &Props) -> VNode {
    let start = props
        .get_text("start")
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0);
    let (count, set_count) = hooks.use_state(start);

    h!(
        "div",
        Attrs::new().with("class", "counter"),
        h!("span", Attrs::new(), count),
        h!("button", Attrs::new().on("click", move |_| set_count.update(|n| n + 1)), "+"),
    )
}

fn home(_: &Hooks, _: &Props) -> VNode {
    h!("h1", Attrs::new(), "home")
}

fn user(_: &Hooks, props: &Props) -> VNode {
    h!("h1", Attrs::new(), format!("user {}", props.get_text("id").unwrap_or_default()))
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_text_change_keeps_element() {
    let (doc, root) = document();
    let message = Rc::new(RefCell::new("hello".to_string()));
    let read = message.clone();
    let handle = mount(
        doc,
        root,
        move |_| h!("div", Attrs::new(), read.borrow().clone()),
        RenderConfig::default(),
    );
    assert_eq!(handle.html(), "<div>hello</div>");

    let div = handle.find("div").unwrap();
    handle.with_host_mut(|doc| doc.take_mutations());

    *message.borrow_mut() = "world".to_string();
    handle.request_render();

    assert_eq!(handle.html(), "<div>world</div>");
    assert_eq!(handle.find("div"), Some(div));

    let log = handle.with_host_mut(|doc| doc.take_mutations());
    assert!(!log.iter().any(|m| matches!(m, Mutation::Replace { parent, .. } if *parent == root)));
    assert!(log.iter().any(|m| matches!(m, Mutation::Replace { parent, .. } if *parent == div)));
}

#[test]
fn test_counter_component() {
    let (doc, root) = document();
    let handle = mount(
        doc,
        root,
        |_| h!(ComponentFn::new(counter), Attrs::new().with("start", 5)),
        RenderConfig::default(),
    );
    assert_eq!(
        handle.html(),
        "<div class=\"counter\"><span>5</span><button>+</button></div>"
    );

    let wrapper = handle.find("div").unwrap();
    let button = handle.find("button").unwrap();
    handle.dispatch(button, "click");

    assert_eq!(
        handle.html(),
        "<div class=\"counter\"><span>6</span><button>+</button></div>"
    );
    assert_eq!(handle.find("div"), Some(wrapper));
    assert_eq!(handle.passes(), 2);
}

#[test]
fn test_placeholder_keeps_siblings() {
    let (doc, root) = document();
    let handle = mount(
        doc,
        root,
        |hooks| {
            let (open, set_open) = hooks.use_state(false);
            h!(
                "section",
                Attrs::new(),
                h!("button", Attrs::new().on("click", move |_| set_open.update(|o| !o)), "toggle"),
                open.then(|| h!("p", Attrs::new(), "details")),
                h!("footer"),
            )
        },
        RenderConfig::default(),
    );

    let footer = handle.find("footer").unwrap();
    let button = handle.find("button").unwrap();

    handle.dispatch(button, "click");
    assert!(handle.html().contains("<p>details</p>"));
    assert_eq!(handle.find("footer"), Some(footer));

    handle.dispatch(button, "click");
    assert!(!handle.html().contains("<p>"));
    assert_eq!(handle.find("footer"), Some(footer));
}

#[test]
fn test_shrinking_list() {
    let (doc, root) = document();
    let items = Rc::new(RefCell::new(vec!["a", "b", "c", "d"]));
    let read = items.clone();
    let handle = mount(
        doc,
        root,
        move |_| {
            let rows: Vec<VNode> = read.borrow().iter().map(|i| h!("li", Attrs::new(), *i)).collect();
            h!("ul", Attrs::new(), rows)
        },
        RenderConfig::default(),
    );

    items.borrow_mut().truncate(1);
    handle.request_render();
    assert_eq!(handle.html(), "<ul><li>a</li></ul>");

    items.borrow_mut().extend(["x", "y"]);
    handle.request_render();
    assert_eq!(handle.html(), "<ul><li>a</li><li>x</li><li>y</li></ul>");
}

// =============================================================================
// Hooks
// =============================================================================

#[test]
fn test_effects_follow_deps() {
    let (doc, root) = document();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mounts = Rc::new(RefCell::new(0));
    let (log, once) = (seen.clone(), mounts.clone());

    let handle = mount(
        doc,
        root,
        move |hooks| {
            let (count, set_count) = hooks.use_state(0);
            let log = log.clone();
            hooks.use_effect(move || log.borrow_mut().push(count), Some(count));
            let once = once.clone();
            hooks.use_effect(move || *once.borrow_mut() += 1, Some(()));
            h!("button", Attrs::new().on("click", move |_| set_count.update(|n| n + 1)), count)
        },
        RenderConfig::default(),
    );

    let button = handle.find("button").unwrap();
    handle.dispatch(button, "click");
    handle.dispatch(button, "click");
    // Unrelated re-render: deps unchanged.
    handle.request_render();

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(*mounts.borrow(), 1);
    assert_eq!(handle.html(), "<button>2</button>");
}

#[test]
fn test_effect_setting_state_rerenders() {
    let (doc, root) = document();
    let handle = mount(
        doc,
        root,
        |hooks| {
            let (ready, set_ready) = hooks.use_state(false);
            hooks.use_effect(move || set_ready.set(true), Some(()));
            VNode::text(if ready { "ready" } else { "loading" })
        },
        RenderConfig::default(),
    );

    assert_eq!(handle.html(), "ready");
    assert_eq!(handle.passes(), 2);
}

#[test]
fn test_roots_are_independent() {
    let app = |hooks: &Hooks| {
        let (n, set_n) = hooks.use_state(0);
        h!("button", Attrs::new().on("click", move |_| set_n.update(|v| v + 1)), n)
    };

    let (doc_a, root_a) = document();
    let (doc_b, root_b) = document();
    let a = mount(doc_a, root_a, app, RenderConfig::default());
    let b = mount(doc_b, root_b, app, RenderConfig::default());

    let button = a.find("button").unwrap();
    a.dispatch(button, "click");

    assert_eq!(a.html(), "<button>1</button>");
    assert_eq!(b.html(), "<button>0</button>");
}

// =============================================================================
// Routing
// =============================================================================

#[test]
fn test_router_navigation() {
    let (doc, root) = document();
    let history = History::new("/");
    let router = Router::new()
        .route("/", ComponentFn::new(home))
        .and_then(|r| r.route("/users/:id", ComponentFn::new(user)))
        .unwrap();

    let nav = history.clone();
    let handle = mount(
        doc,
        root,
        move |hooks| {
            h!(
                "div",
                Attrs::new(),
                link(&nav, "/users/42", None, "profile"),
                router.view(&nav, hooks),
            )
        },
        RenderConfig::default(),
    );
    assert_eq!(handle.html(), "<div><a href=\"/users/42\">profile</a><h1>home</h1></div>");

    let anchor = handle.find("a").unwrap();
    let event = handle.dispatch(anchor, "click").unwrap();
    assert!(event.default_prevented());
    assert_eq!(history.location(), "/users/42");
    assert_eq!(handle.html(), "<div><a href=\"/users/42\">profile</a><h1>user 42</h1></div>");

    assert!(history.back());
    assert!(handle.html().ends_with("<h1>home</h1></div>"));

    history.navigate("/nowhere");
    assert!(handle.html().contains("<div class=\"not-found\">404 - page not found</div>"));
    assert!(!history.can_go_forward());
}
