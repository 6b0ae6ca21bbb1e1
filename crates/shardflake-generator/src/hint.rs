use rand::{rng, Rng};
use shardflake_core::SHARD_COUNT;

/// Chooses the shard for each generated identifier.
///
/// The returned value is reduced modulo the shard count, so implementations
/// may return any integer.
pub trait ShardHint: Send + Sync {
    fn hint(&self) -> u64;

    /// The shard number derived from [`hint`](ShardHint::hint).
    fn shard(&self) -> u16 {
        (self.hint() % SHARD_COUNT) as u16
    }
}

/// Picks a uniformly random shard using the thread-local RNG.
#[derive(Default, Clone, Copy, Debug)]
pub struct RandomShard;

impl ShardHint for RandomShard {
    fn hint(&self) -> u64 {
        rng().random()
    }
}

/// Always returns the same hint. Useful for pinning a shard in tests or
/// for single-writer deployments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedShard(pub u64);

impl ShardHint for FixedShard {
    fn hint(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_hint_is_reduced_modulo_shard_count() {
        assert_eq!(FixedShard(0).shard(), 0);
        assert_eq!(FixedShard(1023).shard(), 1023);
        assert_eq!(FixedShard(1024).shard(), 0);
        assert_eq!(FixedShard(u64::MAX).shard(), 1023);
    }

    #[test]
    fn random_hint_stays_in_range() {
        let hint = RandomShard;
        for _ in 0..10_000 {
            assert!(hint.shard() < 1024);
        }
    }
}
