//! History - In-memory location stack.
//!
//! Plays the part of the browser history for the router: a list of visited
//! paths with a current position. Navigation (`navigate`, `back`,
//! `forward`) notifies the bound hooks runtime, which resets its cursor and
//! requests a render, so the new route starts from slot 0.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::hooks::Hooks;

struct HistoryState {
    entries: Vec<String>,
    index: usize,
    listener: Option<Hooks>,
}

/// Shared history handle. Clones see the same stack.
#[derive(Clone)]
pub struct History(Rc<RefCell<HistoryState>>);

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("History")
            .field("entries", &state.entries)
            .field("index", &state.index)
            .finish()
    }
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(HistoryState {
            entries: vec![initial.into()],
            index: 0,
            listener: None,
        })))
    }

    /// Current path.
    pub fn location(&self) -> String {
        let state = self.0.borrow();
        state.entries[state.index].clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn can_go_back(&self) -> bool {
        self.0.borrow().index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let state = self.0.borrow();
        state.index + 1 < state.entries.len()
    }

    /// Bind the runtime to notify on navigation. Only the first binding
    /// sticks; returns whether this call bound it.
    pub fn listen(&self, hooks: &Hooks) -> bool {
        let mut state = self.0.borrow_mut();
        if state.listener.is_some() {
            return false;
        }
        state.listener = Some(hooks.clone());
        true
    }

    /// Drop the bound runtime.
    pub fn unlisten(&self) {
        self.0.borrow_mut().listener.take();
    }

    /// Push a new entry without notifying. Forward entries are discarded.
    pub fn push(&self, path: impl Into<String>) {
        let mut state = self.0.borrow_mut();
        let next = state.index + 1;
        state.entries.truncate(next);
        state.entries.push(path.into());
        state.index = next;
    }

    /// Push a new entry and re-render.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        debug!(%path, "navigate");
        self.push(path);
        self.notify();
    }

    /// Step back one entry. Returns false at the start of the stack.
    pub fn back(&self) -> bool {
        {
            let mut state = self.0.borrow_mut();
            if state.index == 0 {
                return false;
            }
            state.index -= 1;
        }
        self.notify();
        true
    }

    /// Step forward one entry. Returns false at the end of the stack.
    pub fn forward(&self) -> bool {
        {
            let mut state = self.0.borrow_mut();
            if state.index + 1 >= state.entries.len() {
                return false;
            }
            state.index += 1;
        }
        self.notify();
        true
    }

    fn notify(&self) {
        // Clone out first: the render reads the location.
        let listener = self.0.borrow().listener.clone();
        if let Some(hooks) = listener {
            hooks.reset_hooks();
            hooks.request_render();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
