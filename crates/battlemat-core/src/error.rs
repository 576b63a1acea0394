//! Error types for board operations.

use thiserror::Error;

/// Recoverable failures of a single board operation.
///
/// None of these are fatal: the operation is aborted, the board is left
/// unchanged and the session reports the error through its notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("No free {size}x{size} square near ({x}, {y})")]
    NoSpace { x: i32, y: i32, size: u32 },
    #[error("A {size}x{size} token does not fit at ({x}, {y})")]
    ResizeOutOfBounds { x: i32, y: i32, size: u32 },
    #[error("Token size must be at least 1, got {0}")]
    InvalidSize(u32),
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

impl BoardError {
    /// Short title used for user-facing notifications.
    pub fn title(&self) -> &'static str {
        match self {
            BoardError::NoSpace { .. } => "No space",
            BoardError::ResizeOutOfBounds { .. } => "Cannot resize",
            BoardError::InvalidSize(_) => "Invalid size",
            BoardError::UnknownEntity(_) => "Not found",
        }
    }
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
