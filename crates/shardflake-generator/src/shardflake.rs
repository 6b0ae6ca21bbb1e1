use crate::error::{GeneratorError, Result};
use crate::hint::{RandomShard, ShardHint};
use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use shardflake_core::{
    check_shard, check_type, codec, Clock, Fields, MixedId, Payload, Stamp, SystemClock, Token,
    MAX_SEC,
};
use shardflake_sequence::{SequenceKey, SequenceStore};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Configures a [`ShardFlake`] generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct GeneratorSettings {
    /// Zero point of the 34-bit seconds field.
    ///
    /// Defaults to the Unix epoch, which keeps the field valid until the year
    /// 2514. Every generator and parser sharing identifiers must agree on it.
    #[builder(default = Timestamp::UNIX_EPOCH)]
    pub epoch: Timestamp,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The result of [`ShardFlake::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// The identifier as a URL-safe token.
    pub uuid: Token,
    pub shard: u16,
    pub sec: u64,
    pub msec: u16,
    pub seq: u8,
}

/// The fields recovered from an identifier by [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decoded {
    #[serde(rename = "type")]
    pub ty: u16,
    pub shard: u16,
    pub sec: u64,
    pub msec: u16,
    pub seq: u8,
}

impl Decoded {
    /// Reconstructs the generation instant relative to `epoch`.
    pub fn timestamp(&self, epoch: Timestamp) -> Option<Timestamp> {
        let offset = SignedDuration::from_secs(i64::try_from(self.sec).ok()?)
            .checked_add(SignedDuration::from_millis(i64::from(self.msec)))?;
        epoch.checked_add(offset).ok()
    }
}

/// Input accepted by [`parse`]: a token or an already decoded integer.
#[derive(Debug, Clone, Copy)]
pub enum Encoded<'a> {
    Token(&'a str),
    Raw(u128),
}

impl<'a> From<&'a str> for Encoded<'a> {
    fn from(token: &'a str) -> Self {
        Encoded::Token(token)
    }
}

impl<'a> From<&'a String> for Encoded<'a> {
    fn from(token: &'a String) -> Self {
        Encoded::Token(token.as_str())
    }
}

impl<'a> From<&'a Token> for Encoded<'a> {
    fn from(token: &'a Token) -> Self {
        Encoded::Token(token.as_str())
    }
}

impl From<u128> for Encoded<'_> {
    fn from(raw: u128) -> Self {
        Encoded::Raw(raw)
    }
}

impl From<MixedId> for Encoded<'_> {
    fn from(id: MixedId) -> Self {
        Encoded::Raw(id.as_u128())
    }
}

/// Decodes an identifier back into its fields.
///
/// Parsing is pure; it needs neither the store nor the clock.
pub fn parse<'a>(input: impl Into<Encoded<'a>>) -> Result<Decoded> {
    let mixed = match input.into() {
        Encoded::Token(token) => codec::decode(token)?,
        Encoded::Raw(raw) => MixedId::try_from(raw)?,
    };

    let (payload, shard) = mixed.unmix();
    let Fields { msec, sec, ty, seq } = payload.unpack();

    Ok(Decoded {
        ty,
        shard,
        sec,
        msec,
        seq,
    })
}

/// Rejects stamps the 34-bit seconds field would truncate.
fn check_seconds(stamp: Stamp) -> Result<Stamp> {
    if stamp.sec > MAX_SEC {
        return Err(GeneratorError::SecondsOverflow {
            sec: stamp.sec,
            max: MAX_SEC,
        });
    }
    Ok(stamp)
}

/// Identifier generator backed by a shared sequence store.
///
/// Each call to [`generate`](ShardFlake::generate) picks a shard from the
/// hint, advances the `(type, shard)` counter, stamps the clock and packs the
/// result. Increasing the number of shards in use spreads counter contention
/// across more keys.
pub struct ShardFlake<S, H = RandomShard, C = SystemClock> {
    store: S,
    hint: H,
    clock: C,
    epoch: Timestamp,
}

impl<S: SequenceStore> ShardFlake<S> {
    /// Creates a generator with random shard selection and the system clock.
    pub fn new(store: S, settings: GeneratorSettings) -> Result<Self> {
        Self::with_parts(store, RandomShard, SystemClock, settings)
    }
}

impl<S, H, C> ShardFlake<S, H, C>
where
    S: SequenceStore,
    H: ShardHint,
    C: Clock,
{
    /// Creates a generator from explicit shard-selection and clock sources.
    pub fn with_parts(store: S, hint: H, clock: C, settings: GeneratorSettings) -> Result<Self> {
        let now = clock.now();
        if settings.epoch > now {
            return Err(GeneratorError::EpochAhead {
                epoch: settings.epoch,
                now,
            });
        }
        check_seconds(Stamp::since(settings.epoch, now))?;

        Ok(Self {
            store,
            hint,
            clock,
            epoch: settings.epoch,
        })
    }

    /// Generates the next identifier for `ty`.
    ///
    /// Fails before touching the store if `ty` exceeds 1023. Store failures
    /// are returned unchanged. Fails once the clock has moved past the last
    /// second the payload can represent.
    pub async fn generate(&self, ty: u32) -> Result<Generated> {
        let ty = check_type(ty)?;
        let shard = self.hint.shard();

        let seq = self.store.next(SequenceKey::new(ty, shard)).await?;
        let Stamp { sec, msec } = check_seconds(Stamp::read(&self.clock, self.epoch))?;

        let payload = Payload::pack(Fields { msec, sec, ty, seq });
        let uuid = Token::encode(MixedId::mix(payload, shard));

        debug!(ty, shard, seq, sec, msec, uuid = %uuid, "Generated identifier");

        Ok(Generated {
            uuid,
            shard,
            sec,
            msec,
            seq,
        })
    }

    /// Generates `count` identifiers for `ty`, stopping at the first error.
    pub async fn generate_many(&self, ty: u32, count: usize) -> Result<Vec<Generated>> {
        let mut generated = Vec::with_capacity(count);
        for _ in 0..count {
            generated.push(self.generate(ty).await?);
        }
        Ok(generated)
    }

    /// Deletes the counter for `(ty, shard)` so it restarts at zero.
    ///
    /// Callers must keep concurrent `generate` calls away from the same key
    /// while resetting.
    pub async fn reset_seq(&self, ty: u32, shard: u32) -> Result<()> {
        let key = SequenceKey::new(check_type(ty)?, check_shard(shard)?);
        trace!(key = %key, "Resetting sequence");
        self.store.reset(key).await?;
        Ok(())
    }

    /// Decodes an identifier; see [`parse`].
    pub fn parse<'a>(&self, input: impl Into<Encoded<'a>>) -> Result<Decoded> {
        parse(input)
    }

    /// The epoch the seconds field is counted from.
    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    /// Returns a reference to the underlying sequence store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
