//! Balance ledger replay and snapshot emission.
//!
//! A single-pass, deterministic fold over one token's chronologically
//! sorted, router-aggregated flow stream. Per-wallet balances accumulate
//! across the whole stream (O(events) total, not O(events × snapshots));
//! snapshots are flushed lazily the first time the replay observes an event
//! past each target block.

mod engine;
mod error;
mod storage;

pub use engine::{replay, BalanceLedger, ReplayOutcome};
pub use error::LedgerError;
pub use storage::{FileSnapshotStorage, SnapshotStorage};
