//! Word decoder: one hex word + a decode kind → display value
//!
//! This is a UI-safe surface. Malformed input never propagates as an error;
//! it is rendered inline as an `Error decoding: ...` value instead.

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DecodeKind;
use crate::domain::calldata::WORD_HEX_LEN;

/// Display value returned for a tag that names no known decode type
pub const UNKNOWN_TYPE: &str = "Unknown type";

/// What a decoded value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueClass {
    /// `0x`-prefixed hex payload (addresses, fixed bytes, raw words)
    Hex,
    /// Base-10 integer
    Number,
    /// `true` / `false`
    Bool,
    /// Offset of an unresolved dynamic value
    Offset,
    /// The requested decode type was not recognised
    Unknown,
    /// The word could not be parsed
    Error,
}

/// A decoded word ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedValue {
    pub text: String,
    pub class: ValueClass,
}

impl DecodedValue {
    fn new(text: impl Into<String>, class: ValueClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }

    fn hex(payload: &str) -> Self {
        Self::new(format!("0x{payload}"), ValueClass::Hex)
    }

    fn number(value: impl ToString) -> Self {
        Self::new(value.to_string(), ValueClass::Number)
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TYPE, ValueClass::Unknown)
    }

    pub fn is_hex(&self) -> bool {
        self.class == ValueClass::Hex
    }

    pub fn is_dynamic(&self) -> bool {
        self.class == ValueClass::Offset
    }
}

impl std::fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Error)]
enum DecodeError {
    #[error("word is {0} hex chars, at most 64 allowed")]
    TooLong(usize),
    #[error("invalid hex character {ch:?} at position {position}")]
    InvalidHex { ch: char, position: usize },
    #[error("{0}")]
    Int(#[from] std::num::ParseIntError),
    #[error("{0}")]
    Uint(#[from] alloy_primitives::ruint::ParseError),
}

/// Decode one word (at most 64 hex chars, no prefix) as `kind`.
///
/// Short words are left-padded with zeros to a full word first.
pub fn decode(word: &str, kind: DecodeKind) -> DecodedValue {
    match try_decode(word, kind) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(%kind, word, error = %err, "word decode failed");
            DecodedValue::new(format!("Error decoding: {err}"), ValueClass::Error)
        }
    }
}

/// Decode by manual type tag (`bytes32`, `address`, `uint256`, ...).
///
/// Unrecognised tags yield the [`UNKNOWN_TYPE`] marker.
pub fn decode_tagged(word: &str, tag: &str) -> DecodedValue {
    match tag.parse::<DecodeKind>() {
        Ok(kind) => decode(word, kind),
        Err(_) => DecodedValue::unknown(),
    }
}

fn pad_word(word: &str) -> Result<String, DecodeError> {
    if word.len() > WORD_HEX_LEN {
        return Err(DecodeError::TooLong(word.len()));
    }
    if let Some((position, ch)) = word.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex { ch, position });
    }
    Ok(format!("{word:0>width$}", width = WORD_HEX_LEN))
}

fn try_decode(word: &str, kind: DecodeKind) -> Result<DecodedValue, DecodeError> {
    let padded = pad_word(word)?;
    // low-order slices of the word, by hex length
    let low = |len: usize| &padded[WORD_HEX_LEN - len..];

    let value = match kind {
        DecodeKind::Bytes32 => DecodedValue::hex(&padded),
        DecodeKind::Address => DecodedValue::hex(low(40)),
        DecodeKind::Uint256 => DecodedValue::number(parse_word(&padded)?),
        DecodeKind::Uint128 => DecodedValue::number(u128::from_str_radix(low(32), 16)?),
        DecodeKind::Uint64 => DecodedValue::number(u64::from_str_radix(low(16), 16)?),
        // reinterpreting the bits subtracts 2^128 above the positive bound
        DecodeKind::Int128 => DecodedValue::number(u128::from_str_radix(low(32), 16)? as i128),
        DecodeKind::FixedBytes(size) => {
            let len = (usize::from(size) * 2).min(WORD_HEX_LEN);
            DecodedValue::hex(&padded[..len])
        }
        DecodeKind::Bool => {
            let text = if parse_word(&padded)?.is_zero() {
                "false"
            } else {
                "true"
            };
            DecodedValue::new(text, ValueClass::Bool)
        }
        DecodeKind::SignedWord(bits) => {
            DecodedValue::number(signed_word(parse_word(&padded)?, bits))
        }
        DecodeKind::Dynamic => DecodedValue::new(
            format!("offset: {} (dynamic)", parse_word(&padded)?),
            ValueClass::Offset,
        ),
    };

    Ok(value)
}

fn parse_word(hex: &str) -> Result<U256, DecodeError> {
    Ok(U256::from_str_radix(hex, 16)?)
}

/// Two's-complement reading of a whole word at `bits` width.
///
/// Values above `2^(bits-1) - 1` have `2^bits` subtracted. The word is not
/// truncated first, so a value with bits set above the width stays positive.
fn signed_word(value: U256, bits: u16) -> String {
    if bits >= 256 {
        return I256::from_raw(value).to_string();
    }
    if bits == 0 {
        return value.to_string();
    }

    let modulus = U256::from(1u8) << usize::from(bits);
    let max_positive = (modulus >> 1usize) - U256::from(1u8);

    if value <= max_positive {
        value.to_string()
    } else if value >= modulus {
        (value - modulus).to_string()
    } else {
        format!("-{}", modulus - value)
    }
}
