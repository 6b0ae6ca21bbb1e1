use crate::error::{Error, Result};
use crate::payload::{Payload, PAYLOAD_BITS};

pub(crate) const SHARD_BITS: u32 = 10;

/// Payload bits emitted ahead of the first shard bit.
const HEADER_BITS: u32 = 11;
/// Payload bits between two consecutive shard bits.
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: u128 = (1 << CHUNK_BITS) - 1;
const ROUND_BITS: u32 = CHUNK_BITS + 1;
const ROUND_MASK: u128 = (1 << ROUND_BITS) - 1;

/// Total width of a mixed identifier.
pub const MIXED_BITS: u32 = PAYLOAD_BITS + SHARD_BITS;

const _: () = assert!(HEADER_BITS + CHUNK_BITS * SHARD_BITS + 1 == PAYLOAD_BITS);

/// A payload with the shard number interleaved into it.
///
/// Layout, MSB to LSB: 11 header bits, then ten rounds of five payload bits
/// followed by one shard bit (shard MSB first), then the last payload bit.
/// Spreading the shard bits through the body keeps consecutive sequence
/// values from showing up as consecutive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MixedId(u128);

impl MixedId {
    /// Interleaves the low ten bits of `shard` into `payload`.
    pub fn mix(payload: Payload, shard: u16) -> Self {
        let p = payload.as_u64() as u128;
        let shard = shard as u128;

        let mut out = p >> (PAYLOAD_BITS - HEADER_BITS);
        for round in 0..SHARD_BITS {
            let shift = PAYLOAD_BITS - HEADER_BITS - CHUNK_BITS * (round + 1);
            let chunk = (p >> shift) & CHUNK_MASK;
            let shard_bit = (shard >> (SHARD_BITS - 1 - round)) & 1;
            out = (out << ROUND_BITS) | (chunk << 1) | shard_bit;
        }
        Self((out << 1) | (p & 1))
    }

    /// Separates the payload and shard number again.
    pub fn unmix(self) -> (Payload, u16) {
        let raw = self.0;

        let mut payload = raw >> (MIXED_BITS - HEADER_BITS);
        let mut shard: u128 = 0;
        for round in 0..SHARD_BITS {
            let shift = MIXED_BITS - HEADER_BITS - ROUND_BITS * (round + 1);
            let chunk = (raw >> shift) & ROUND_MASK;
            payload = (payload << CHUNK_BITS) | (chunk >> 1);
            shard = (shard << 1) | (chunk & 1);
        }
        payload = (payload << 1) | (raw & 1);

        (Payload::from_raw(payload as u64), shard as u16)
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }
}

impl From<MixedId> for u128 {
    fn from(value: MixedId) -> Self {
        value.0
    }
}

impl TryFrom<u128> for MixedId {
    type Error = Error;

    fn try_from(raw: u128) -> Result<Self> {
        if raw >> MIXED_BITS != 0 {
            return Err(Error::Decode(format!(
                "value {raw:#x} is wider than {MIXED_BITS} bits"
            )));
        }
        Ok(Self(raw))
    }
}
