//! ABI type handling: signature parsing, type mapping and word decoding

mod candidate;
mod decoder;
mod kind;
mod signature;

pub use candidate::{sort_candidates, CandidateSignature};
pub use decoder::{decode, decode_tagged, DecodedValue, ValueClass, UNKNOWN_TYPE};
pub use kind::{map_abi_type, param_decode_kind, DecodeKind, UnknownDecodeType};
pub use signature::{parse_signature_types, FunctionSignature};
