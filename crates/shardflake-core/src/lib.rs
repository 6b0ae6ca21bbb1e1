//! Bit-level building blocks for shardflake identifiers.
//!
//! An identifier is built in three steps: the five logical fields are packed
//! into a 62-bit [`Payload`], the shard number is interleaved into it to form
//! a 72-bit [`MixedId`], and the mixed value is rendered as a URL-safe
//! [`Token`]. Every step is exactly invertible.

pub mod clock;
pub mod codec;
pub mod error;
pub mod mixer;
pub mod payload;

pub use clock::{Clock, Stamp, SystemClock};
pub use codec::Token;
pub use error::{Error, Result};
pub use mixer::MixedId;
pub use payload::{Fields, Payload};

/// Largest caller-supplied type accepted by the generator.
pub const MAX_TYPE: u16 = (1 << payload::TYPE_BITS) - 1;

/// Largest sequence value; the counter wraps to zero after it.
pub const MAX_SEQ: u8 = (1 << payload::SEQ_BITS) - 1;

/// Largest seconds offset the payload can hold.
pub const MAX_SEC: u64 = (1 << payload::SEC_BITS) - 1;

/// Number of shard slots.
pub const SHARD_COUNT: u64 = 1 << mixer::SHARD_BITS;

/// Largest shard number.
pub const MAX_SHARD: u16 = (SHARD_COUNT - 1) as u16;

/// Checks that `ty` fits the type field.
pub fn check_type(ty: u32) -> Result<u16> {
    u16::try_from(ty)
        .ok()
        .filter(|ty| *ty <= MAX_TYPE)
        .ok_or(Error::TypeOutOfRange { ty, max: MAX_TYPE })
}

/// Checks that `shard` is a valid shard number.
pub fn check_shard(shard: u32) -> Result<u16> {
    u16::try_from(shard)
        .ok()
        .filter(|shard| *shard <= MAX_SHARD)
        .ok_or(Error::ShardOutOfRange {
            shard,
            max: MAX_SHARD,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_range_is_inclusive_of_1023() {
        assert_eq!(check_type(0), Ok(0));
        assert_eq!(check_type(1023), Ok(1023));
        assert_eq!(
            check_type(1024),
            Err(Error::TypeOutOfRange { ty: 1024, max: 1023 })
        );
        assert!(check_type(u32::MAX).is_err());
    }

    #[test]
    fn seconds_field_spans_34_bits() {
        assert_eq!(MAX_SEC, 17_179_869_183);
    }

    #[test]
    fn shard_range_is_inclusive_of_1023() {
        assert_eq!(check_shard(1023), Ok(1023));
        assert!(check_shard(1024).is_err());
    }
}
