//! Domain models and data structures for ledger reconstruction.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Raw EVM log shapes as fetched from an RPC endpoint
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Token, TransferEvent, Snapshot, ...)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::evm::{DelegationArgs, RawDelegationLog, RawTransferLog, TransferArgs};

// Re-export core types
pub use core::{
	resolve_delegatee, DelegationAction, DelegationEvent, DelegationState, FlowEdge, Snapshot,
	SnapshotEntry, Token, TransactionFlow, TransferEvent, VoteRecord, WILDCARD_SPACE,
};

// Re-export config types
pub use config::ConfigLoader;
