//! Transform error types.

use thiserror::Error;

/// Per-record failures while mapping or enriching a record.
///
/// These are never fatal: the record is dropped and the stream continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A cross-system lookup failed or found nothing.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The record could not be mapped to the destination shape.
    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl TransformError {
    /// Create a lookup error.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a mapping error.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }
}
