//! Governance token ledger reconstruction and participant classification.
//!
//! This crate rebuilds per-wallet balances of DAO governance tokens from raw
//! on-chain `Transfer` event dumps and classifies the resulting holder base.
//!
//! # Architecture
//! The batch pipeline is built from four layered engines:
//! - Normalizer: turns raw fetched event shards into a canonical,
//!   chronologically sorted transfer sequence
//! - Aggregator: collapses multi-hop router transactions into net
//!   source→sink flows that conserve value
//! - Ledger: replays the flow stream and emits per-wallet holding snapshots
//!   at caller-specified target blocks
//! - Classifier: derives whale / non-whale participant sets from a snapshot,
//!   with delegation attribution
//!
//! Everything operates on already-fetched local data; there is no network
//! surface in this crate.

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
