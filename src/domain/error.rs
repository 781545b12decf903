//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations detected while building or
/// normalizing a game tree. They carry no I/O context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("coordinate out of range: ({x}, {y})")]
    CoordinateOutOfRange { x: i64, y: i64 },

    #[error("board size out of range: {0}")]
    BoardSize(String),

    #[error("{format} parse failed: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },
}

impl DomainError {
    /// Create a parse failure for the named dialect.
    pub fn parse(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            format,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
