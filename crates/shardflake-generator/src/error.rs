use jiff::Timestamp;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors returned by generator construction, generation and parsing.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Id(#[from] shardflake_core::Error),
    #[error(transparent)]
    Sequence(#[from] shardflake_sequence::SequenceError),
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("{sec} seconds since the epoch do not fit the seconds field (max {max})")]
    SecondsOverflow { sec: u64, max: u64 },
}
