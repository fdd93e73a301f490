//! Error types for chunking operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Errors raised before any chunk is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// A caller-supplied argument is out of range (e.g. `max_len == 0`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Dialect name not recognised.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
    /// Oversize policy name not recognised.
    #[error("Unknown oversize policy: {0}")]
    UnknownOversizePolicy(String),
}

impl ChunkError {
    pub(crate) fn zero_max_len() -> Self {
        Self::InvalidArgument("max_len must be positive".to_string())
    }
}
