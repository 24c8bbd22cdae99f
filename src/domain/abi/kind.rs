//! Decode kinds and the ABI type → decode kind tables
//!
//! Two tables map ABI type tokens to decode kinds and they differ on purpose:
//! [`map_abi_type`] picks one of the six word primitives offered for manual
//! block decoding, while [`param_decode_kind`] drives the per-parameter view
//! and understands `bool`, narrow fixed bytes, signed widths and dynamic types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How a single 32-byte word is turned into a display value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    /// Whole word as hex
    Bytes32,
    /// Low-order 20 bytes
    Address,
    /// Whole word, unsigned
    Uint256,
    /// Low-order 16 bytes, unsigned
    Uint128,
    /// Low-order 8 bytes, unsigned
    Uint64,
    /// Low-order 16 bytes, two's complement
    Int128,
    /// High-order N bytes (fixed bytes are left-aligned)
    FixedBytes(u8),
    /// Non-zero word is `true`
    Bool,
    /// Whole word read as a two's-complement value of the given bit width
    SignedWord(u16),
    /// Head slot of a dynamic type, holding an offset into the tail
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown type: {0}")]
pub struct UnknownDecodeType(pub String);

impl DecodeKind {
    /// Word primitives offered for manual decoding, in menu order
    pub const PRIMITIVES: [DecodeKind; 6] = [
        DecodeKind::Bytes32,
        DecodeKind::Address,
        DecodeKind::Uint256,
        DecodeKind::Uint128,
        DecodeKind::Int128,
        DecodeKind::Uint64,
    ];

    pub fn is_primitive(&self) -> bool {
        Self::PRIMITIVES.contains(self)
    }

    /// Position in [`Self::PRIMITIVES`]
    pub fn primitive_index(&self) -> Option<usize> {
        Self::PRIMITIVES.iter().position(|k| k == self)
    }
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeKind::Bytes32 => f.write_str("bytes32"),
            DecodeKind::Address => f.write_str("address"),
            DecodeKind::Uint256 => f.write_str("uint256"),
            DecodeKind::Uint128 => f.write_str("uint128"),
            DecodeKind::Uint64 => f.write_str("uint64"),
            DecodeKind::Int128 => f.write_str("int128"),
            DecodeKind::FixedBytes(size) => write!(f, "bytes{size}"),
            DecodeKind::Bool => f.write_str("bool"),
            DecodeKind::SignedWord(bits) => write!(f, "int{bits}"),
            DecodeKind::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Parses the tags of the manual primitives only
impl FromStr for DecodeKind {
    type Err = UnknownDecodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bytes32" => Ok(DecodeKind::Bytes32),
            "address" => Ok(DecodeKind::Address),
            "uint256" => Ok(DecodeKind::Uint256),
            "uint128" => Ok(DecodeKind::Uint128),
            "int128" => Ok(DecodeKind::Int128),
            "uint64" => Ok(DecodeKind::Uint64),
            other => Err(UnknownDecodeType(other.to_string())),
        }
    }
}

/// Bit width suffix of `int<N>` / `uint<N>`; `None` if `ty` is not of that form.
///
/// A missing suffix means 256. Oversized suffixes saturate.
fn int_width(ty: &str, prefix: &str) -> Option<u32> {
    let digits = ty.strip_prefix(prefix)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if digits.is_empty() {
        return Some(256);
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Byte size of `bytes<N>` (at least one digit required)
fn fixed_bytes_size(ty: &str) -> Option<u32> {
    let digits = ty.strip_prefix("bytes")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Map an ABI type token to a manual word primitive.
///
/// `None` means the type cannot be decoded from its head word alone (arrays,
/// tuples, `bytes`, `string`, unknown types); only a type hint is shown.
pub fn map_abi_type(abi_type: &str) -> Option<DecodeKind> {
    let ty = abi_type.trim().to_lowercase();

    if ty.contains('[') || ty.contains('(') {
        return None;
    }

    match ty.as_str() {
        "address" => return Some(DecodeKind::Address),
        // bool is shown as its raw 0/1 value here
        "bool" => return Some(DecodeKind::Uint256),
        "bytes32" => return Some(DecodeKind::Bytes32),
        "bytes" | "string" => return None,
        _ => {}
    }

    if fixed_bytes_size(&ty).is_some() {
        return Some(DecodeKind::Bytes32);
    }

    if let Some(bits) = int_width(&ty, "int") {
        // wider signed values are shown raw, without sign correction
        return Some(if bits <= 128 {
            DecodeKind::Int128
        } else {
            DecodeKind::Uint256
        });
    }

    if let Some(bits) = int_width(&ty, "uint") {
        return Some(match bits {
            0..=64 => DecodeKind::Uint64,
            65..=128 => DecodeKind::Uint128,
            _ => DecodeKind::Uint256,
        });
    }

    None
}

/// Map an ABI type token to the decode kind used for the parameter view.
///
/// Always yields something displayable; unknown types fall back to raw hex.
pub fn param_decode_kind(abi_type: &str) -> DecodeKind {
    let ty = abi_type.trim().to_lowercase();

    match ty.as_str() {
        "address" => return DecodeKind::Address,
        "bool" => return DecodeKind::Bool,
        "bytes32" => return DecodeKind::Bytes32,
        _ => {}
    }

    if let Some(size) = fixed_bytes_size(&ty) {
        return DecodeKind::FixedBytes(size.min(32) as u8);
    }

    if ty == "bytes" || ty == "string" || ty.contains('[') || ty.contains('(') {
        return DecodeKind::Dynamic;
    }

    if let Some(bits) = int_width(&ty, "int") {
        return match bits {
            0 => DecodeKind::Bytes32,
            1..=256 => DecodeKind::SignedWord(bits as u16),
            // no word value can exceed the positive bound
            _ => DecodeKind::Uint256,
        };
    }

    if int_width(&ty, "uint").is_some() {
        return DecodeKind::Uint256;
    }

    DecodeKind::Bytes32
}
