use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The wildcard space id: a delegation that applies to every space unless a
/// space-specific delegation overrides it.
pub const WILDCARD_SPACE: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DelegationAction {
    Set,
    Clear,
}

/// One decoded `SetDelegate` / `ClearDelegate` event.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegationEvent {
    pub block_number: u64,
    pub transaction_index: u64,
    pub log_index: u64,
    pub delegator: String,
    pub delegatee: String,
    pub space: String,
    pub action: DelegationAction,
}

impl DelegationEvent {
    pub fn ordering_key(&self) -> (u64, u64, u64) {
        (self.block_number, self.transaction_index, self.log_index)
    }
}

/// Delegation state as of one block: `delegator -> (space -> delegatee)`.
/// BTreeMaps keep the serialized snapshots key-sorted.
pub type DelegationState = BTreeMap<String, BTreeMap<String, String>>;

/// Resolve the effective delegatee for a delegator in one space. A
/// space-specific delegation overrides the wildcard.
pub fn resolve_delegatee(state: &DelegationState, delegator: &str, space: &str) -> Option<String> {
    let spaces = state.get(delegator)?;
    let mut delegatee = spaces.get(WILDCARD_SPACE);
    if let Some(specific) = spaces.get(space) {
        delegatee = Some(specific);
    }
    delegatee.cloned()
}
