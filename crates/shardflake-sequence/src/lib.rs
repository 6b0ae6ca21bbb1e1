//! Atomic, wraparound sequence counters keyed by `(type, shard)`.

pub mod error;
pub mod memory;
pub mod redis;
pub mod store;

pub use error::{Result, SequenceError};
pub use memory::InMemorySequenceStore;
pub use self::redis::RedisSequenceStore;
pub use store::{SequenceKey, SequenceStore};
