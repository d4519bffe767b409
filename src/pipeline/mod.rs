//! Render Pipeline
//!
//! Connects the app function, the hooks runtime and the host tree.
//!
//! # Pipeline Architecture
//!
//! ```text
//! request_render -> reset_hooks -> app(&hooks) -> resolve -> diff -> patch -> host
//! ```
//!
//! ## Data Flow
//!
//! 1. **mount** - Registers the re-render callback and runs the first pass
//! 2. **RenderRoot** - First pass materializes into the container; later
//!    passes diff against the retained tree and patch
//! 3. **RenderConfig** - Per-root settings (event prefix, pass limit)
//!
//! ## Key Design Principles
//!
//! - **One pass per request**: setters only bump a counter, the drain loop
//!   in the hooks runtime runs the passes
//! - **Retained baseline**: the last successful resolved tree is the only
//!   thing diffed against; a failed pass drops it

mod config;
mod mount;
mod root;

pub use config::*;
pub use mount::*;
pub use root::*;
