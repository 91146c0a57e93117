//! Source error types.
//!
//! Errors raised while fetching a page of records from a source. Any of them
//! ends the stream it occurred in.

use thiserror::Error;

/// Errors that can occur while reading from a paginated source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network or database failure reaching the source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The source answered but the page payload could not be understood.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The producer stopped without delivering end-of-stream.
    #[error("Source aborted: {0}")]
    Aborted(String),
}

impl SourceError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an aborted error.
    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::Aborted(msg.into())
    }

    /// Whether a fresh attempt at the same request could succeed.
    ///
    /// Only transport failures qualify; a payload that failed to decode will
    /// fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Transport(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
                Self::Decode(err.to_string())
            }
            other => Self::Transport(other.to_string()),
        }
    }
}
