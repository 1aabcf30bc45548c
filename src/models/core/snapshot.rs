use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-wallet state inside a snapshot.
///
/// The snapshot retains every address seen by the ledger, including negative
/// and contract holdings; positivity and contract filtering happen at
/// classification time so no information is lost in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SnapshotEntry {
    pub holding: f64,
    pub contract: bool,
}

/// An immutable export of per-wallet balances at one target block for one
/// token. Entries are ordered descending by holding (a presentation
/// convention), with a lexicographic address tie-break for reproducibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub token: String,
    pub block: u64,
    pub entries: Vec<(String, SnapshotEntry)>,
}

impl Snapshot {
    /// Build a snapshot of the live balance state, tagging each address with
    /// its membership in the contract label set.
    pub fn build(
        token: &str,
        block: u64,
        balances: &HashMap<String, f64>,
        contracts: &HashSet<String>,
    ) -> Self {
        let mut entries: Vec<(String, SnapshotEntry)> = balances
            .iter()
            .map(|(address, &holding)| {
                (
                    address.clone(),
                    SnapshotEntry {
                        holding,
                        contract: contracts.contains(address),
                    },
                )
            })
            .collect();
        entries.sort_by(|(a, ea), (b, eb)| {
            eb.holding
                .partial_cmp(&ea.holding)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(b))
        });

        Snapshot {
            token: token.to_string(),
            block,
            entries,
        }
    }

    pub fn get(&self, address: &str) -> Option<&SnapshotEntry> {
        self.entries
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, e)| e)
    }

    /// The JSON object written to disk: `address -> {holding, contract}`,
    /// preserving entry order.
    pub fn to_document(&self) -> Map<String, Value> {
        let mut document = Map::new();
        for (address, entry) in &self.entries {
            document.insert(
                address.clone(),
                serde_json::json!({ "holding": entry.holding, "contract": entry.contract }),
            );
        }
        document
    }

    pub fn from_document(
        token: &str,
        block: u64,
        document: Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let mut entries = Vec::with_capacity(document.len());
        for (address, value) in document {
            let entry: SnapshotEntry = serde_json::from_value(value)?;
            entries.push((address, entry));
        }
        Ok(Snapshot {
            token: token.to_string(),
            block,
            entries,
        })
    }
}
