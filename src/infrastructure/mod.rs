//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The 4byte.directory signature resolver
//! - Tokio runtime bridge for async operations

pub mod fourbyte;
pub mod runtime;

pub use fourbyte::{FourByteClient, ResolverError, SignatureResolver};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
