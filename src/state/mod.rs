//! State Module - Runtime state that drives re-rendering
//!
//! - **Hooks** - Per-root slot array, `use_state`, `use_effect`, render requests
//! - **History** - In-memory location stack used by the router

mod history;
mod hooks;

pub use history::*;
pub use hooks::*;
