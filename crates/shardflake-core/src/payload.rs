use serde::Serialize;

pub(crate) const MARKER_BITS: u32 = 1;
pub(crate) const MSEC_BITS: u32 = 10;
pub(crate) const SEC_BITS: u32 = 34;
pub(crate) const TYPE_BITS: u32 = 10;
pub(crate) const SEQ_BITS: u32 = 7;

/// Total width of a packed payload.
pub const PAYLOAD_BITS: u32 = MARKER_BITS + MSEC_BITS + SEC_BITS + TYPE_BITS + SEQ_BITS;

const MSEC_MASK: u64 = (1 << MSEC_BITS) - 1;
const SEC_MASK: u64 = (1 << SEC_BITS) - 1;
const TYPE_MASK: u64 = (1 << TYPE_BITS) - 1;
const SEQ_MASK: u64 = (1 << SEQ_BITS) - 1;

/// The four decodable fields of a payload. The marker bit is implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fields {
    /// Millisecond within the second.
    pub msec: u16,
    /// Seconds since the generator epoch.
    pub sec: u64,
    /// Caller-defined namespace.
    #[serde(rename = "type")]
    pub ty: u16,
    /// Counter value scoped to `(type, shard)`.
    pub seq: u8,
}

/// A 62-bit packed payload, laid out MSB to LSB as
/// `marker:1 | msec:10 | sec:34 | type:10 | seq:7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Payload(u64);

impl Payload {
    /// Packs `fields` into a payload.
    ///
    /// Values wider than their field are truncated; range checks belong to
    /// the caller.
    pub fn pack(fields: Fields) -> Self {
        let mut raw: u64 = 1;
        raw = (raw << MSEC_BITS) | (fields.msec as u64 & MSEC_MASK);
        raw = (raw << SEC_BITS) | (fields.sec & SEC_MASK);
        raw = (raw << TYPE_BITS) | (fields.ty as u64 & TYPE_MASK);
        raw = (raw << SEQ_BITS) | (fields.seq as u64 & SEQ_MASK);
        Self(raw)
    }

    /// Extracts the fields in reverse order of packing.
    pub fn unpack(self) -> Fields {
        let mut raw = self.0;
        let seq = (raw & SEQ_MASK) as u8;
        raw >>= SEQ_BITS;
        let ty = (raw & TYPE_MASK) as u16;
        raw >>= TYPE_BITS;
        let sec = raw & SEC_MASK;
        raw >>= SEC_BITS;
        let msec = (raw & MSEC_MASK) as u16;
        Fields { msec, sec, ty, seq }
    }

    /// Wraps a raw value, keeping only the low [`PAYLOAD_BITS`] bits.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw & ((1 << PAYLOAD_BITS) - 1))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<Payload> for u64 {
    fn from(value: Payload) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn pack_places_fields_at_fixed_offsets() {
        let payload = Payload::pack(Fields {
            msec: 0,
            sec: 0,
            ty: 0,
            seq: 0,
        });
        // Only the marker bit is set.
        assert_eq!(payload.as_u64(), 1_u64 << 61);

        let payload = Payload::pack(Fields {
            msec: 1,
            sec: 1,
            ty: 1,
            seq: 1,
        });
        let expected: u64 = (1 << 61) | (1 << 51) | (1 << 17) | (1 << 7) | 1;
        assert_eq!(payload.as_u64(), expected);
    }

    #[test]
    fn payload_is_62_bits_wide() {
        let max = Payload::pack(Fields {
            msec: 1023,
            sec: (1 << 34) - 1,
            ty: 1023,
            seq: 127,
        });
        assert_eq!(max.as_u64(), (1_u64 << 62) - 1);
        assert_eq!(PAYLOAD_BITS, 62);
    }

    #[test]
    fn unpack_inverts_pack_over_random_fields() {
        let mut rng = rand::rng();
        for _ in 0..10_000 {
            let fields = Fields {
                msec: rng.random_range(0..=1023),
                sec: rng.random_range(0..1 << 34),
                ty: rng.random_range(0..=1023),
                seq: rng.random_range(0..=127),
            };
            assert_eq!(Payload::pack(fields).unpack(), fields);
        }
    }

    #[test]
    fn unpack_handles_field_boundaries() {
        for (msec, sec, ty, seq) in [
            (0, 0, 0, 0),
            (999, 0, 1023, 127),
            (1023, (1 << 34) - 1, 0, 0),
            (500, 1_700_000_000, 512, 64),
        ] {
            let fields = Fields { msec, sec, ty, seq };
            assert_eq!(Payload::pack(fields).unpack(), fields);
        }
    }

    #[test]
    fn out_of_range_values_are_truncated() {
        let fields = Fields {
            msec: 1024 + 5,
            sec: (1 << 34) + 9,
            ty: 1024 + 3,
            seq: 128 + 1,
        };
        let unpacked = Payload::pack(fields).unpack();
        assert_eq!(
            unpacked,
            Fields {
                msec: 5,
                sec: 9,
                ty: 3,
                seq: 1,
            }
        );
    }
}
