//! Blockchain-specific model implementations.
//!
//! Raw, wire-shaped records as fetched from an RPC endpoint, before
//! normalization into the core domain models.

pub mod evm;
