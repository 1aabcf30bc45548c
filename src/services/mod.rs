//! Core processing engines.
//!
//! - `normalizer`: raw transfer shards → canonical chronological sequence
//! - `aggregator`: per-transaction router-flow collapsing
//! - `ledger`: balance replay and snapshot emission
//! - `delegation`: delegation event replay and state snapshots
//! - `classifier`: whale / non-whale participant classification

pub mod aggregator;
pub mod classifier;
pub mod delegation;
pub mod ledger;
pub mod normalizer;
