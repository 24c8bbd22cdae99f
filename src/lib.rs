//! hexsplit: split EVM calldata into 32-byte words and decode them
//!
//! The library holds everything except the terminal front-end: the pure
//! split/decode core under [`domain`], the split session in [`core`], the
//! signature directory client and async bridge in [`infrastructure`].

pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod logging;
