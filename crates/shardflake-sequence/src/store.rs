use crate::error::Result;
use async_trait::async_trait;
use shardflake_core::MAX_SEQ;
use std::fmt::Display;
use std::sync::Arc;

/// Identifies one counter: a caller type and a shard slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    pub ty: u16,
    pub shard: u16,
}

impl SequenceKey {
    pub fn new(ty: u16, shard: u16) -> Self {
        Self { ty, shard }
    }
}

impl Display for SequenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ty, self.shard)
    }
}

/// The value a counter moves to from `current`.
///
/// A missing counter starts at zero and the maximum wraps back to zero.
pub fn advance(current: Option<u8>) -> u8 {
    match current {
        Some(value) if value < MAX_SEQ => value + 1,
        _ => 0,
    }
}

/// A shared store holding one bounded counter per [`SequenceKey`].
///
/// Implementations must perform the read, [`advance`] and write of
/// [`next`](SequenceStore::next) as one atomic unit: two concurrent callers
/// on the same key never receive the same value. No ordering between them is
/// promised and failures are returned as-is, without retries.
#[async_trait]
pub trait SequenceStore: Send + Sync + 'static {
    /// Advances the counter for `key` and returns its new value.
    async fn next(&self, key: SequenceKey) -> Result<u8>;

    /// Deletes the counter for `key`; the following `next` returns zero.
    ///
    /// Not atomic with respect to in-flight `next` calls on the same key.
    async fn reset(&self, key: SequenceKey) -> Result<()>;
}

#[async_trait]
impl<S: SequenceStore + ?Sized> SequenceStore for Arc<S> {
    async fn next(&self, key: SequenceKey) -> Result<u8> {
        (**self).next(key).await
    }

    async fn reset(&self, key: SequenceKey) -> Result<()> {
        (**self).reset(key).await
    }
}
