use serde::{Deserialize, Serialize};

/// One normalized ERC-20 `Transfer` event.
///
/// Addresses are lowercased and `amount` is already divided by the token's
/// decimal precision. The serialized field names match the tabular layout of
/// the normalized per-token transfer files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub block_number: u64,
    pub transaction_hash: String,
    pub transaction_index: u64,
    pub log_index: u64,
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl TransferEvent {
    /// Replay ordering key: `(block_number, transaction_index, log_index)`.
    pub fn ordering_key(&self) -> (u64, u64, u64) {
        (self.block_number, self.transaction_index, self.log_index)
    }

    pub fn edge(&self) -> FlowEdge {
        FlowEdge {
            from: self.from.clone(),
            to: self.to.clone(),
            amount: self.amount,
        }
    }
}

/// The unit the balance ledger consumes: a net `from → to` transfer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// All net flow edges of one transaction, after router aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFlow {
    pub block_number: u64,
    pub transaction_hash: String,
    pub edges: Vec<FlowEdge>,
}
