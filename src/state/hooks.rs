//! Hooks Runtime - Per-root hook slots and render requests.
//!
//! A component gets persistent state by calling hooks in a fixed order.
//! The runtime keeps one slot per hook call and a cursor that walks the
//! slots during a render pass:
//!
//! ```text
//! pass N:   use_state(0)  use_effect(..)  use_state("")
//!              slot 0         slot 1          slot 2
//! ```
//!
//! The cursor goes back to 0 with [`Hooks::reset_hooks`], which the caller
//! does once per pass (and on navigation). Changing the order or number of
//! hook calls between renders misattributes state; only a slot holding a
//! value of the wrong type is detected (and re-initialized).
//!
//! # Render requests
//!
//! Setters never re-enter rendering. [`Hooks::request_render`] bumps a
//! pending counter; if no pass is in flight it runs the registered
//! re-render callback once per pending request until the counter drains.
//! A request made while a pass is running is picked up by the same loop
//! after that pass returns.
//!
//! # Example
//!
//! ```ignore
//! fn counter(hooks: &Hooks, _props: &Props) -> VNode {
//!     let (count, set_count) = hooks.use_state(0);
//!     hooks.use_effect(|| tracing::info!(count, "count changed"), Some(count));
//!
//!     h!("button", Attrs::new().on("click", move |_| set_count.update(|n| n + 1)), count)
//! }
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

bitflags::bitflags! {
    /// Runtime state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RenderFlags: u8 {
        /// A render pass (or drain loop) is in flight.
        const RENDERING = 1 << 0;
        /// A re-render callback is registered.
        const MOUNTED = 1 << 1;
    }
}

// =============================================================================
// Runtime State
// =============================================================================

enum Slot {
    State(Box<dyn Any>),
    /// Holds the `Option<D>` deps recorded on the last run.
    Effect(Box<dyn Any>),
}

#[derive(Default)]
struct HookStore {
    slots: Vec<Option<Slot>>,
    cursor: usize,
}

struct Runtime {
    store: RefCell<HookStore>,
    flags: Cell<RenderFlags>,
    pending: Cell<usize>,
    max_passes: Cell<Option<usize>>,
    rerender: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Runtime {
    fn set_flag(&self, flag: RenderFlags, on: bool) {
        let mut flags = self.flags.get();
        flags.set(flag, on);
        self.flags.set(flags);
    }
}

/// Clears `RENDERING` even if the callback unwinds.
struct RenderingGuard<'a>(&'a Runtime);

impl Drop for RenderingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_flag(RenderFlags::RENDERING, false);
    }
}

// =============================================================================
// Hooks Handle
// =============================================================================

/// Handle to one hooks runtime. Cheap to clone; all clones share state.
///
/// Every mounted root owns its own runtime, so independent roots never
/// see each other's slots.
#[derive(Clone)]
pub struct Hooks {
    rt: Rc<Runtime>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("cursor", &self.cursor())
            .field("slots", &self.slot_count())
            .field("flags", &self.flags())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            rt: Rc::new(Runtime {
                store: RefCell::new(HookStore::default()),
                flags: Cell::new(RenderFlags::empty()),
                pending: Cell::new(0),
                max_passes: Cell::new(None),
                rerender: RefCell::new(None),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    /// Move the cursor back to slot 0. Slot contents are kept.
    pub fn reset_hooks(&self) {
        self.rt.store.borrow_mut().cursor = 0;
    }

    /// Drop every slot and reset the cursor.
    pub fn clear(&self) {
        let mut store = self.rt.store.borrow_mut();
        store.slots.clear();
        store.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.rt.store.borrow().cursor
    }

    pub fn slot_count(&self) -> usize {
        self.rt.store.borrow().slots.len()
    }

    /// Claim the slot under the cursor and advance.
    fn advance(&self) -> usize {
        let mut store = self.rt.store.borrow_mut();
        let slot = store.cursor;
        store.cursor += 1;
        if store.slots.len() <= slot {
            store.slots.resize_with(slot + 1, || None);
        }
        slot
    }

    // -------------------------------------------------------------------------
    // use_state
    // -------------------------------------------------------------------------

    /// Persistent state for this call position.
    ///
    /// The slot is initialized with `initial` the first time it is reached;
    /// afterwards `initial` is ignored and the stored value is returned.
    pub fn use_state<T: Clone + 'static>(&self, initial: T) -> (T, SetState<T>) {
        let slot = self.advance();
        let mut store = self.rt.store.borrow_mut();

        let current = match &store.slots[slot] {
            Some(Slot::State(value)) => match value.downcast_ref::<T>() {
                Some(value) => Some(value.clone()),
                None => {
                    warn!(slot, "state slot holds a different type; hook order changed?");
                    None
                }
            },
            Some(Slot::Effect(_)) => {
                warn!(slot, "state hook landed on an effect slot; hook order changed?");
                None
            }
            None => None,
        };

        let value = match current {
            Some(value) => value,
            None => {
                store.slots[slot] = Some(Slot::State(Box::new(initial.clone())));
                initial
            }
        };

        let setter = SetState {
            rt: Rc::downgrade(&self.rt),
            slot,
            _marker: PhantomData,
        };
        (value, setter)
    }

    // -------------------------------------------------------------------------
    // use_effect
    // -------------------------------------------------------------------------

    /// Run `effect` synchronously when its dependencies changed.
    ///
    /// Runs on the first render at this slot, on every render when `deps`
    /// is `None`, and whenever `deps` differs from the previous render's.
    /// Use a tuple or `Vec` for several dependencies.
    pub fn use_effect<D: PartialEq + 'static>(&self, effect: impl FnOnce(), deps: Option<D>) {
        let slot = self.advance();

        let should_run = {
            let store = self.rt.store.borrow();
            match &store.slots[slot] {
                None => true,
                Some(Slot::Effect(prev)) => match (prev.downcast_ref::<Option<D>>(), &deps) {
                    (_, None) => true,
                    (Some(Some(prev)), Some(next)) => prev != next,
                    (Some(None), Some(_)) => true,
                    (None, Some(_)) => {
                        warn!(slot, "effect deps changed type; hook order changed?");
                        true
                    }
                },
                Some(Slot::State(_)) => {
                    warn!(slot, "effect hook landed on a state slot; hook order changed?");
                    true
                }
            }
        };

        // Record before running so a render triggered from inside the
        // effect already sees the new deps.
        self.rt.store.borrow_mut().slots[slot] = Some(Slot::Effect(Box::new(deps)));

        if should_run {
            trace!(slot, "running effect");
            effect();
        }
    }

    // -------------------------------------------------------------------------
    // Render requests
    // -------------------------------------------------------------------------

    /// Register the callback that performs one render pass.
    pub fn set_rerender(&self, callback: impl Fn() + 'static) {
        *self.rt.rerender.borrow_mut() = Some(Rc::new(callback));
        self.rt.set_flag(RenderFlags::MOUNTED, true);
    }

    /// Unregister the render callback. Later requests are dropped.
    pub fn clear_rerender(&self) {
        self.rt.rerender.borrow_mut().take();
        self.rt.set_flag(RenderFlags::MOUNTED, false);
        self.rt.pending.set(0);
    }

    /// Cap the number of passes one drain may run. `None` means unbounded.
    pub fn set_pass_limit(&self, limit: Option<usize>) {
        self.rt.max_passes.set(limit);
    }

    pub fn flags(&self) -> RenderFlags {
        self.rt.flags.get()
    }

    pub fn is_rendering(&self) -> bool {
        self.flags().contains(RenderFlags::RENDERING)
    }

    /// Requests not yet served.
    pub fn pending(&self) -> usize {
        self.rt.pending.get()
    }

    /// Ask for one more render pass.
    pub fn request_render(&self) {
        let rt = &self.rt;
        rt.pending.set(rt.pending.get() + 1);

        if self.is_rendering() {
            trace!(pending = rt.pending.get(), "render requested during pass; deferred");
            return;
        }

        let Some(callback) = rt.rerender.borrow().clone() else {
            trace!("render requested with no callback registered");
            rt.pending.set(0);
            return;
        };

        self.drain(callback);
    }

    fn drain(&self, callback: Rc<dyn Fn()>) {
        let rt = &*self.rt;
        rt.set_flag(RenderFlags::RENDERING, true);
        let _guard = RenderingGuard(rt);

        let limit = rt.max_passes.get();
        let mut passes = 0usize;
        while rt.pending.get() > 0 {
            if limit.is_some_and(|max| passes >= max) {
                warn!(passes, pending = rt.pending.get(), "render pass limit reached; dropping requests");
                rt.pending.set(0);
                break;
            }
            rt.pending.set(rt.pending.get() - 1);
            passes += 1;
            callback();
        }

        debug!(passes, "render requests drained");
    }
}

// =============================================================================
// Setter
// =============================================================================

/// Setter returned by [`Hooks::use_state`].
///
/// Holds a weak reference to the runtime, so a setter kept alive by an
/// event handler does not keep the runtime alive after unmount.
pub struct SetState<T> {
    rt: Weak<Runtime>,
    slot: usize,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            rt: self.rt.clone(),
            slot: self.slot,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState").field("slot", &self.slot).finish()
    }
}

impl<T: 'static> SetState<T> {
    /// Store `value`, then request a render.
    pub fn set(&self, value: T) {
        let Some(rt) = self.rt.upgrade() else { return };
        {
            let mut store = rt.store.borrow_mut();
            if store.slots.len() <= self.slot {
                store.slots.resize_with(self.slot + 1, || None);
            }
            store.slots[self.slot] = Some(Slot::State(Box::new(value)));
        }
        Hooks { rt }.request_render();
    }
}

impl<T: Clone + 'static> SetState<T> {
    /// Store `update(&current)`, then request a render.
    ///
    /// `update` runs on a copy with the store unborrowed, so it may call
    /// other setters.
    pub fn update(&self, update: impl FnOnce(&T) -> T) {
        let Some(rt) = self.rt.upgrade() else { return };
        let current = {
            let store = rt.store.borrow();
            let Some(Some(Slot::State(value))) = store.slots.get(self.slot) else {
                warn!(slot = self.slot, "functional update on an empty slot ignored");
                return;
            };
            let Some(current) = value.downcast_ref::<T>() else {
                warn!(slot = self.slot, "functional update on a slot of another type ignored");
                return;
            };
            current.clone()
        };

        let next = update(&current);
        {
            let mut store = rt.store.borrow_mut();
            if store.slots.len() <= self.slot {
                store.slots.resize_with(self.slot + 1, || None);
            }
            store.slots[self.slot] = Some(Slot::State(Box::new(next)));
        }
        Hooks { rt }.request_render();
    }
}

// =============================================================================
// Tests
// =============================================================================
