use crate::error::{Error, Result};
use crate::mixer::{MixedId, MIXED_BITS};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Bytes used to render a mixed identifier. Always a whole number of bytes,
/// so leading zero bits are kept and every token has the same length.
pub const TOKEN_BYTES: usize = MIXED_BITS.div_ceil(8) as usize;

/// Length of an encoded token in characters.
pub const TOKEN_LEN: usize = TOKEN_BYTES.div_ceil(3) * 4;

const SUBSTITUTIONS: [(char, char); 3] = [('+', '-'), ('/', '_'), ('=', '.')];

/// A URL-safe textual identifier.
///
/// The alphabet is standard base64 with `+`, `/` and `=` replaced by `-`,
/// `_` and `.` respectively.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Renders `id` as big-endian bytes, zero padded to [`TOKEN_BYTES`].
    pub fn encode(id: MixedId) -> Self {
        let bytes = id.as_u128().to_be_bytes();
        let encoded = general_purpose::STANDARD.encode(&bytes[bytes.len() - TOKEN_BYTES..]);
        let token = encoded
            .chars()
            .map(|c| substitute(c, |(from, to)| (from, to)))
            .collect();
        Self(token)
    }

    /// Decodes the token back into a mixed identifier.
    pub fn decode(&self) -> Result<MixedId> {
        decode(&self.0)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn substitute(c: char, direction: impl Fn((char, char)) -> (char, char)) -> char {
    SUBSTITUTIONS
        .iter()
        .map(|&pair| direction(pair))
        .find_map(|(from, to)| (from == c).then_some(to))
        .unwrap_or(c)
}

/// Decodes a token string into a mixed identifier.
///
/// Inputs shorter than [`TOKEN_BYTES`] bytes are left padded with zeros.
/// The unsubstituted characters `+`, `/` and `=` are rejected.
pub fn decode(token: &str) -> Result<MixedId> {
    if let Some(c) = token.chars().find(|c| SUBSTITUTIONS.iter().any(|(from, _)| from == c)) {
        return Err(Error::Decode(format!(
            "'{token}' contains '{c}', which is not in the token alphabet"
        )));
    }

    let standard: String = token
        .chars()
        .map(|c| substitute(c, |(from, to)| (to, from)))
        .collect();

    let bytes = general_purpose::STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| Error::Decode(format!("'{token}' is not valid base64: {e}")))?;

    if bytes.is_empty() || bytes.len() > TOKEN_BYTES {
        return Err(Error::Decode(format!(
            "'{token}' decodes to {} bytes; expected 1..={TOKEN_BYTES}",
            bytes.len()
        )));
    }

    let mut buf = [0_u8; 16];
    buf[16 - bytes.len()..].copy_from_slice(&bytes);
    MixedId::try_from(u128::from_be_bytes(buf))
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.0).finish()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MixedId> for Token {
    fn from(id: MixedId) -> Self {
        Token::encode(id)
    }
}

impl FromStr for Token {
    type Err = Error;

    /// Accepts any decodable form and stores its canonical 12-character
    /// rendering.
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::encode(decode(s)?))
    }
}

impl TryFrom<String> for Token {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Fields, Payload};
    use rand::Rng;

    fn mixed(raw: u128) -> MixedId {
        MixedId::try_from(raw).unwrap()
    }

    #[test]
    fn token_width_is_fixed() {
        assert_eq!(TOKEN_BYTES, 9);
        assert_eq!(TOKEN_LEN, 12);
    }

    #[test]
    fn small_values_keep_leading_zero_bytes() {
        // A one-byte value must not collapse into a shorter token.
        let token = Token::encode(mixed(1));
        assert_eq!(token.as_str(), "AAAAAAAAAAAB");
        assert_eq!(token.decode().unwrap(), mixed(1));

        let zero = Token::encode(mixed(0));
        assert_eq!(zero.as_str().len(), TOKEN_LEN);
        assert_eq!(zero.decode().unwrap(), mixed(0));
    }

    #[test]
    fn every_generated_token_has_the_same_length() {
        let p = Payload::pack(Fields {
            msec: 0,
            sec: 0,
            ty: 0,
            seq: 0,
        });
        let token = Token::encode(MixedId::mix(p, 0));
        assert_eq!(token.as_str().len(), TOKEN_LEN);
    }

    #[test]
    fn substitutes_url_unsafe_characters() {
        // 0xFB_FF_BF encodes to "+/+/" in standard base64.
        let token = Token::encode(mixed(0xFB_FF_BF_FB_FF_BF));
        assert!(!token.as_str().contains(['+', '/', '=']));
        assert!(token.as_str().ends_with("-_-_-_-_"));
        assert_eq!(token.decode().unwrap(), mixed(0xFB_FF_BF_FB_FF_BF));
    }

    #[test]
    fn decode_accepts_padded_short_input() {
        // One byte, standard padding replaced by dots.
        assert_eq!(decode("AQ..").unwrap(), mixed(1));
    }

    #[test]
    fn decode_inverts_encode_over_random_values() {
        let mut rng = rand::rng();
        for _ in 0..10_000 {
            let raw = rng.random::<u128>() >> (128 - MIXED_BITS);
            let id = mixed(raw);
            assert_eq!(Token::encode(id).decode().unwrap(), id);
        }
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(matches!(decode("not base64!"), Err(Error::Decode(_))));
    }

    #[test]
    fn decode_rejects_wrong_lengths() {
        assert!(matches!(decode(""), Err(Error::Decode(_))));
        // Twelve bytes is wider than any identifier.
        assert!(matches!(decode("AAAAAAAAAAAAAAAA"), Err(Error::Decode(_))));
    }

    #[test]
    fn decode_rejects_unsubstituted_characters() {
        let canonical = Token::encode(mixed(0xFB_FF_BF_FB_FF_BF));
        let standard = canonical.as_str().replace('-', "+").replace('_', "/");
        assert!(matches!(decode(&standard), Err(Error::Decode(_))));
        assert!(matches!(decode("AQ=="), Err(Error::Decode(_))));
    }

    #[test]
    fn parsed_short_token_is_stored_canonically() {
        let parsed: Token = "AQ..".parse().unwrap();
        assert_eq!(parsed, Token::encode(mixed(1)));
        assert_eq!(parsed.as_str(), "AAAAAAAAAAAB");

        let converted = Token::try_from(String::from("AQ..")).unwrap();
        assert_eq!(converted, parsed);
    }

    #[test]
    fn token_parses_from_a_string() {
        let token: Token = "AAAAAAAAAAAB".parse().unwrap();
        assert_eq!(token.to_string(), "AAAAAAAAAAAB");
        assert!("?".parse::<Token>().is_err());
    }

    #[test]
    fn token_serializes_as_a_json_string() {
        let token = Token::encode(mixed(0xFB_FF_BF_FB_FF_BF));
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{token}\""));

        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);

        let short: Token = serde_json::from_str("\"AQ..\"").unwrap();
        assert_eq!(short, Token::encode(mixed(1)));

        assert!(serde_json::from_str::<Token>("\"not base64!\"").is_err());
        assert!(serde_json::from_str::<Token>("\"AQ==\"").is_err());
    }
}
