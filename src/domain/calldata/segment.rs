//! Splitting normalized hex into 32-byte words

use std::fmt;

use super::normalize::{normalize, NormalizedHex, SplitError};

/// Hex characters in one ABI word (32 bytes)
pub const WORD_HEX_LEN: usize = 64;

/// Bytes in one ABI word
pub const WORD_BYTES: usize = WORD_HEX_LEN / 2;

/// Hex characters in a function selector (4 bytes)
pub const SELECTOR_HEX_LEN: usize = 8;

/// One segment of the input, at most one word long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBlock {
    index: usize,
    hex: String,
}

impl HexBlock {
    /// Position in the block sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw hex content, case preserved, no prefix
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Number of hex characters
    pub fn len(&self) -> usize {
        self.hex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hex.is_empty()
    }

    /// Only complete blocks can be decoded
    pub fn is_complete(&self) -> bool {
        self.hex.len() == WORD_HEX_LEN
    }

    /// Byte offset of this block relative to the start of the argument data
    pub fn byte_offset(&self) -> usize {
        self.index * WORD_BYTES
    }

    /// Header line as shown above each block.
    ///
    /// The byte offset is only meaningful when a selector was peeled off, so it
    /// is shown in calldata mode only.
    pub fn header(&self, calldata_mode: bool) -> String {
        let partial = if self.is_complete() { "" } else { " - partial" };
        if calldata_mode {
            format!(
                "Block {} - Offset 0x{:02x} ({} chars{})",
                self.index,
                self.byte_offset(),
                self.len(),
                partial
            )
        } else {
            format!("Block {} ({} chars{})", self.index, self.len(), partial)
        }
    }
}

impl fmt::Display for HexBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.hex)
    }
}

/// Leading 4-byte function selector (8 hex chars, case preserved)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSelector(String);

impl FunctionSelector {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase `0x`-prefixed form used for lookups
    pub fn to_lookup_hex(&self) -> String {
        format!("0x{}", self.0.to_lowercase())
    }

    /// Link for a manual lookup in the signature directory web UI
    pub fn browse_url(&self, base: &str) -> String {
        format!("{}?bytes4_signature={}", base, self.to_lookup_hex())
    }
}

impl fmt::Display for FunctionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

/// Result of segmenting one input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmented {
    pub selector: Option<FunctionSelector>,
    pub blocks: Vec<HexBlock>,
}

impl Segmented {
    /// Concatenation of the selector (if any) and all blocks, in order
    pub fn reassemble(&self) -> String {
        let mut out = String::new();
        if let Some(selector) = &self.selector {
            out.push_str(selector.as_str());
        }
        for block in &self.blocks {
            out.push_str(block.hex());
        }
        out
    }
}

/// Peel off the selector (calldata mode) and chunk the rest into words.
///
/// The final block may be shorter than a word. An input that is exactly a
/// selector yields zero blocks, which is not an error.
pub fn segment(hex: &NormalizedHex, calldata_mode: bool) -> Result<Segmented, SplitError> {
    let mut rest = hex.as_str();
    let mut selector = None;

    if calldata_mode && !rest.is_empty() {
        if rest.len() < SELECTOR_HEX_LEN {
            return Err(SplitError::CalldataTooShort { len: rest.len() });
        }
        let (head, tail) = rest.split_at(SELECTOR_HEX_LEN);
        selector = Some(FunctionSelector(head.to_string()));
        rest = tail;
    }

    // NormalizedHex is ASCII, so byte offsets are char boundaries
    let blocks = (0..rest.len())
        .step_by(WORD_HEX_LEN)
        .enumerate()
        .map(|(index, start)| {
            let end = (start + WORD_HEX_LEN).min(rest.len());
            HexBlock {
                index,
                hex: rest[start..end].to_string(),
            }
        })
        .collect();

    Ok(Segmented { selector, blocks })
}

/// Normalize raw input and segment it in one step
pub fn split(raw: &str, calldata_mode: bool) -> Result<Segmented, SplitError> {
    let hex = normalize(raw)?;
    let segmented = segment(&hex, calldata_mode)?;
    tracing::debug!(
        chars = hex.len(),
        blocks = segmented.blocks.len(),
        selector = segmented.selector.as_ref().map(|s| s.as_str()),
        "split input"
    );
    Ok(segmented)
}
