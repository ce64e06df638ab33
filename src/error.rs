//! Errors returned by [`Tree`](crate::Tree) operations.
//!
//! Lookups that find nothing return `None` rather than an error, and deleting a
//! key that isn't present does nothing. The only failure is trying to insert a
//! key twice.

/// An error from modifying a [`Tree`](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The key being inserted is already in the tree. The tree was not modified.
    #[error("key {0} is already present in the tree")]
    DuplicateKey(i64),
}

/// Result type for fallible [`Tree`](crate::Tree) operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
