use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One governance token tracked by the pipeline.
///
/// `decimals` is optional because it is resolved out-of-band (from the
/// governance strategy or an on-chain `decimals()` call); a token whose
/// decimals could not be resolved is dropped from processing rather than
/// aborting the batch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Token {
    pub address: String,
    pub decimals: Option<u32>,
    pub target_blocks: Vec<u64>,
    #[serde(default)]
    pub staking_contracts: Vec<String>,
    #[serde(default)]
    pub paused: bool,
}

impl Token {
    /// Staking contract addresses, lowercased, as a lookup set.
    pub fn staking_set(&self) -> HashSet<String> {
        self.staking_contracts
            .iter()
            .map(|a| a.to_lowercase())
            .collect()
    }

    /// Target blocks sorted ascending with duplicates removed.
    pub fn sorted_targets(&self) -> Vec<u64> {
        let mut targets = self.target_blocks.clone();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}
