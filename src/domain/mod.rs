//! Domain layer - pure hex and ABI logic
//!
//! Nothing in here performs I/O. Everything is synchronous and
//! deterministic, so the presentation layer can call into it freely.

pub mod abi;
pub mod calldata;
