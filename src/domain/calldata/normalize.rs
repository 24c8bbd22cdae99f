//! Hex input normalization

use std::fmt;

use thiserror::Error;

/// Errors that abort a split before any block is produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Nothing left to split (blank input or a bare `0x`)
    #[error("Please enter a hex string")]
    EmptyInput,

    /// A non-hex character survived normalization
    #[error(
        "Invalid hex string. Only hexadecimal characters (0-9, a-f, A-F) are allowed \
         (found {ch:?} at position {position})"
    )]
    InvalidHexCharacter { ch: char, position: usize },

    /// Calldata mode needs a full 4-byte selector
    #[error("Calldata too short. Need at least 4 bytes (8 hex chars) for function selector, got {len}")]
    CalldataTooShort { len: usize },
}

/// Hex digits only, never empty.
///
/// The only way to obtain one is [`normalize`], so everything downstream can
/// slice it by byte index without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHex(String);

impl NormalizedHex {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip an optional `0x`/`0X` prefix and all whitespace, then validate.
///
/// Case is preserved.
pub fn normalize(raw: &str) -> Result<NormalizedHex, SplitError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SplitError::EmptyInput);
    }

    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let hex: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some((position, ch)) = hex.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(SplitError::InvalidHexCharacter { ch, position });
    }

    if hex.is_empty() {
        return Err(SplitError::EmptyInput);
    }

    Ok(NormalizedHex(hex))
}
