//! Error types for the huffroute core.
//!
//! Only genuinely invalid inputs are errors. Rejected names, degenerate
//! Huffman builds and lookups against empty areas are ordinary outcomes and
//! are reported through the return types of the dispatcher operations.

use thiserror::Error;

/// Top-level error type for all core operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be a positive integer
    #[error("invalid capacity {0}: must be at least 1")]
    InvalidCapacity(u32),

    /// Huffman construction error
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),
}

/// Huffman engine errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No leaves supplied (cannot build a tree)
    #[error("empty leaf set: cannot build a tree")]
    EmptyLeafSet,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
