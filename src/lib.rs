//! # spark-vdom
//!
//! Minimal virtual-DOM UI library for Rust.
//!
//! Applications describe their UI as a tree of immutable [`VNode`]s built
//! with [`h`] / [`h!`]. Function components keep state across renders
//! through the [`Hooks`] runtime, and every state change re-renders the
//! root: the new tree is diffed against the previous one and only the
//! difference is applied to the host tree.
//!
//! ## Architecture
//!
//! ```text
//! app(&hooks) -> VNode tree -> resolve -> diff(previous, next) -> Patch -> HostAdapter
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The virtual node model
//! - [`primitives`] - Attribute values, `h`, router
//! - [`host`] - Host tree adapter trait and the in-memory document
//! - [`renderer`] - Materialize, diff, patch
//! - [`state`] - Hooks runtime and navigation history
//! - [`pipeline`] - Render root, mount, configuration
//! - [`error`] - Error types

pub mod error;
pub mod host;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{PatchError, RouteError};

pub use host::{HostAdapter, HostKind, MemoryDocument, Mutation, NodeId, Snapshot};

pub use primitives::{
    Attrs, CATCH_ALL, CHILDREN_KEY, Event, EventHandler, IntoChildren, NOT_FOUND_TEXT, PropValue,
    Route, Router, flatten, fragment, h, link, text,
};

pub use renderer::{
    Origin, Patch, PropPatch, Reconciler, ResolvedKind, ResolvedNode, changed, diff, diff_children, diff_props,
    diff_resolved, diff_resolved_children, is_noop, resolve,
};

pub use state::{History, Hooks, RenderFlags, SetState};

pub use pipeline::{DEFAULT_EVENT_PREFIX, MountHandle, RenderConfig, RenderRoot, mount};
