//! Primitives - The vocabulary for describing a UI.
//!
//! - [`types`] - Attribute values, event handlers, the ordered attribute map
//! - [`element`] - The `h` constructor, the `h!` macro, child flattening
//! - [`router`] - Path-based routing and `link`
//!
//! # Example
//!
//! ```ignore
//! use spark_vdom::{h, Attrs};
//!
//! let view = h!("div", Attrs::new().with("class", "app"),
//!     h!("h1", Attrs::new(), "Hello"),
//!     show_footer.then(|| h!("footer", Attrs::new(), "bye")),
//! );
//! ```

mod element;
mod router;
mod types;

pub use element::*;
pub use router::*;
pub use types::*;
