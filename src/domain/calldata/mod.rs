//! Calldata input handling: normalization and word segmentation

mod normalize;
mod segment;

pub use normalize::{normalize, NormalizedHex, SplitError};
pub use segment::{
    segment, split, FunctionSelector, HexBlock, Segmented, SELECTOR_HEX_LEN, WORD_BYTES,
    WORD_HEX_LEN,
};
