//! Sharded, sequence-stamped identifiers backed by a shared counter store.
//!
//! [`ShardFlake`] picks a shard through a [`ShardHint`], advances the
//! `(type, shard)` counter in a [`SequenceStore`], stamps the current time and
//! returns the packed, shard-mixed identifier as a URL-safe token. [`parse`]
//! reverses the transformation without touching the store.

pub mod error;
pub mod hint;
pub mod shardflake;

pub use error::{GeneratorError, Result};
pub use hint::{FixedShard, RandomShard, ShardHint};
pub use shardflake::{parse, Decoded, Encoded, Generated, GeneratorSettings, ShardFlake};

pub use shardflake_sequence::{InMemorySequenceStore, RedisSequenceStore, SequenceStore};
