use crate::error::Result;
use crate::store::{advance, SequenceKey, SequenceStore};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

/// In-memory implementation of [`SequenceStore`] using DashMap.
///
/// The entry guard holds the shard lock for the key while the counter is
/// advanced, which makes `next` atomic within one process. Counters are not
/// shared across processes.
#[derive(Debug, Default)]
pub struct InMemorySequenceStore {
    counters: DashMap<SequenceKey, u8>,
}

impl InMemorySequenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last value issued for `key`, if any.
    pub fn current(&self, key: SequenceKey) -> Option<u8> {
        self.counters.get(&key).map(|value| *value)
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn next(&self, key: SequenceKey) -> Result<u8> {
        let seq = match self.counters.entry(key) {
            Entry::Occupied(mut entry) => {
                let seq = advance(Some(*entry.get()));
                entry.insert(seq);
                seq
            }
            Entry::Vacant(entry) => *entry.insert(advance(None)),
        };
        trace!(key = %key, seq, "Advanced in-memory sequence");
        Ok(seq)
    }

    async fn reset(&self, key: SequenceKey) -> Result<()> {
        self.counters.remove(&key);
        trace!(key = %key, "Reset in-memory sequence");
        Ok(())
    }
}
