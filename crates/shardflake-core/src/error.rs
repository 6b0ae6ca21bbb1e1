use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or decoding identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("type {ty} is out of range; expected 0..={max}")]
    TypeOutOfRange { ty: u32, max: u16 },
    #[error("shard {shard} is out of range; expected 0..={max}")]
    ShardOutOfRange { shard: u32, max: u16 },
    #[error("invalid token: {0}")]
    Decode(String),
}
