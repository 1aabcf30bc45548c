use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::models::{FlowEdge, Snapshot, TransactionFlow};
use crate::services::ledger::LedgerError;

/// Running signed balances for one token. Absent entries are implicitly
/// zero; the map is mutated only by replaying edges in chronological order
/// and is never reset mid-stream.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<String, f64>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        BalanceLedger {
            balances: HashMap::new(),
        }
    }

    pub fn apply(&mut self, edge: &FlowEdge) {
        *self.balances.entry(edge.from.clone()).or_insert(0.0) -= edge.amount;
        *self.balances.entry(edge.to.clone()).or_insert(0.0) += edge.amount;
    }

    pub fn balance(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    pub fn balances(&self) -> &HashMap<String, f64> {
        &self.balances
    }
}

/// Result of one replay invocation.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub snapshots: Vec<Snapshot>,
    pub edges_applied: usize,
    pub edges_skipped: usize,
}

/// Replay a token's flow stream, emitting a snapshot at each target block.
///
/// Targets are flushed strictly before the first event whose block exceeds
/// them, so the snapshot for target `B` reflects exactly the events with
/// `block_number <= B`; targets at or past the final event's block are
/// flushed from the terminal state. Each target is flushed exactly once.
/// Edges touching a staking contract leave every balance unchanged: the
/// staked representation is treated as the same economic holding as the
/// underlying token.
pub fn replay(
    ledger: &mut BalanceLedger,
    token: &str,
    flows: &[TransactionFlow],
    target_blocks: &[u64],
    staking_contracts: &HashSet<String>,
    contracts: &HashSet<String>,
) -> Result<ReplayOutcome, LedgerError> {
    let mut targets: Vec<u64> = target_blocks.to_vec();
    targets.sort_unstable();
    targets.dedup();

    if targets.is_empty() && !flows.is_empty() {
        return Err(LedgerError::missing_targets(format!(
            "token {} has transfer history but no target blocks",
            token
        )));
    }

    let mut snapshots = Vec::with_capacity(targets.len());
    let mut next_target = 0usize;
    let mut edges_applied = 0usize;
    let mut edges_skipped = 0usize;

    for flow in flows {
        // All requested states are flushed; the rest of the stream is moot
        if next_target >= targets.len() {
            break;
        }

        while next_target < targets.len() && targets[next_target] < flow.block_number {
            snapshots.push(Snapshot::build(
                token,
                targets[next_target],
                ledger.balances(),
                contracts,
            ));
            next_target += 1;
        }

        for edge in &flow.edges {
            if staking_contracts.contains(&edge.from) || staking_contracts.contains(&edge.to) {
                edges_skipped += 1;
                continue;
            }
            ledger.apply(edge);
            edges_applied += 1;
        }
    }

    // Targets at or beyond the final event's block get the terminal state
    if next_target < targets.len() {
        debug!(
            token,
            remaining = targets.len() - next_target,
            "final flush of unsatisfied target blocks"
        );
        for &target in &targets[next_target..] {
            snapshots.push(Snapshot::build(token, target, ledger.balances(), contracts));
        }
    }

    info!(
        token,
        snapshots = snapshots.len(),
        edges_applied,
        edges_skipped,
        "replay complete"
    );

    Ok(ReplayOutcome {
        snapshots,
        edges_applied,
        edges_skipped,
    })
}
