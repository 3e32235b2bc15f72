//! Nullable infrastructure for deterministic testing.
//!
//! The node transport and the key derivation are abstracted behind traits.
//! This crate provides test-friendly implementations that:
//! - Return scripted values
//! - Record every call for later assertions
//! - Never touch the network
//!
//! Usage: hand a nullable to the client in place of the real collaborator.

pub mod derivation;
pub mod transport;

pub use derivation::NullDerivation;
pub use transport::{BroadcastCall, HandleKind, NullHandle, NullTransport};
