//! Error types for htmlweave.
//!
//! Only two failure modes are recoverable: a malformed attribute name
//! (reported at the call that supplied it) and a circular reference
//! (reported when rendering reaches an element that contains itself).
//! Contract violations such as popping an empty scope stack or giving
//! child content to a void element panic instead.

use thiserror::Error;

/// Errors that can occur while building or rendering a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeaveError {
    /// An attribute name failed validation after normalization.
    #[error("invalid attribute name: {name:?}")]
    InvalidAttributeName {
        /// The offending name, as supplied by the caller
        name: String,
    },

    /// An element was found to contain itself, directly or transitively.
    #[error("circular reference detected while rendering <{tag}>")]
    CircularReference {
        /// Tag name of the element that closed the cycle
        tag: String,
    },
}

/// Result type alias for htmlweave operations.
pub type WeaveResult<T> = Result<T, WeaveError>;

impl WeaveError {
    /// Create an invalid-name error from the caller-supplied name.
    pub(crate) fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidAttributeName { name: name.into() }
    }
}
