use thiserror::Error;

/// Type alias for sequence store results.
pub type Result<T> = std::result::Result<T, SequenceError>;

#[derive(Debug, Clone, Error)]
pub enum SequenceError {
    #[error("sequence store unavailable: {0}")]
    Unavailable(String),
    #[error("sequence store operation timed out: {0}")]
    Timeout(String),
    #[error("sequence value is invalid: {0}")]
    InvalidData(String),
    #[error("sequence store operation failed: {0}")]
    Operation(String),
}
