//! Error types.

use thiserror::Error;

/// A patch did not line up with the host tree it was applied to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// `Replace`/`Update` targeted a child position with no host node.
    #[error("no host node at child index {index}")]
    MissingNode { index: usize },
}

/// Route registration failures.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route `{pattern}` declares parameter `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("route `{pattern}` does not compile")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
