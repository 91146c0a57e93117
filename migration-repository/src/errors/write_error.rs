//! Write error types.

use thiserror::Error;

/// Errors that can occur while writing a record to the destination.
///
/// A write error terminates the sink and with it the whole pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// Network or database failure reaching the destination.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The destination refused the record.
    #[error("Write rejected: {0}")]
    Rejected(String),
}

impl WriteError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a rejected error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

impl From<sqlx::Error> for WriteError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Rejected(db.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}
