use async_trait::async_trait;
use redis::AsyncCommands;
use shardflake_core::MAX_SEQ;
use tracing::{debug, trace, warn};

use crate::error::{Result, SequenceError};
use crate::store::{SequenceKey, SequenceStore};

/// Default key prefix; counters live at `uuid:{type}:{shard}`.
pub const DEFAULT_KEY_PREFIX: &str = "uuid:";

/// Reads the counter, advances it with wraparound and writes it back.
/// Absent, non-numeric or negative values restart at zero.
///
/// Redis runs a script without interleaving other commands, which is what
/// keeps concurrent callers from observing the same value.
const NEXT_SEQ_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]))
local seq = 0
if current ~= nil and current >= 0 and current < tonumber(ARGV[1]) then
  seq = current + 1
end
redis.call('SET', KEYS[1], seq)
return seq
"#;

/// A Redis-based implementation of [`SequenceStore`].
#[derive(Debug, Clone)]
pub struct RedisSequenceStore {
    conn: redis::aio::MultiplexedConnection,
    script: redis::Script,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> SequenceError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        SequenceError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        SequenceError::Unavailable(message)
    } else {
        SequenceError::Operation(message)
    }
}

impl RedisSequenceStore {
    /// Creates a store on top of an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a store with a custom key prefix (e.g. "myapp:seq:").
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            script: redis::Script::new(NEXT_SEQ_SCRIPT),
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a client for `redis_url` and connects with `key_prefix`.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid Redis connection info", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    /// Generates the Redis key for a counter.
    fn counter_key(&self, key: SequenceKey) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl SequenceStore for RedisSequenceStore {
    async fn next(&self, key: SequenceKey) -> Result<u8> {
        let redis_key = self.counter_key(key);
        trace!(key = %redis_key, "Advancing sequence in Redis");

        let mut conn = self.conn.clone();
        let value: i64 = self
            .script
            .key(&redis_key)
            .arg(i64::from(MAX_SEQ))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(key = %redis_key, error = %e, "Redis error on sequence advance");
                map_redis_error("failed to advance sequence in Redis", e)
            })?;

        let seq = u8::try_from(value)
            .ok()
            .filter(|seq| *seq <= MAX_SEQ)
            .ok_or_else(|| {
                SequenceError::InvalidData(format!(
                    "sequence for key '{redis_key}' is {value}; expected 0..={MAX_SEQ}"
                ))
            })?;

        debug!(key = %redis_key, seq, "Advanced sequence in Redis");
        Ok(seq)
    }

    async fn reset(&self, key: SequenceKey) -> Result<()> {
        let redis_key = self.counter_key(key);
        trace!(key = %redis_key, "Resetting sequence in Redis");

        let mut conn = self.conn.clone();
        match conn.del::<_, ()>(&redis_key).await {
            Ok(()) => {
                debug!(key = %redis_key, "Reset sequence in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key = %redis_key, error = %e, "Failed to reset sequence in Redis");
                Err(map_redis_error("failed to delete sequence from Redis", e))
            }
        }
    }
}
