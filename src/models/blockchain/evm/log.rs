//! Raw EVM event log shapes.
//!
//! These mirror one JSONL line of a fetched event shard. Field casing
//! follows the JSON-RPC convention of the fetcher that produced the dumps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw ERC-20 `Transfer` log entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawTransferLog {
	#[serde(rename = "blockNumber")]
	pub block_number: u64,
	#[serde(rename = "transactionHash")]
	pub transaction_hash: String,
	#[serde(rename = "transactionIndex")]
	pub transaction_index: u64,
	#[serde(rename = "logIndex")]
	pub log_index: u64,
	pub args: TransferArgs,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferArgs {
	pub from: String,
	pub to: String,
	/// Raw uint256 value. Fetchers emit it either as a JSON number or as a
	/// decimal string (values above 2^53 do not survive as numbers in every
	/// JSON writer), so both are accepted.
	pub amount: Value,
}

impl TransferArgs {
	/// The raw amount as a decimal string, if the JSON shape is usable.
	pub fn raw_amount(&self) -> Option<String> {
		match &self.amount {
			Value::String(s) => Some(s.clone()),
			Value::Number(n) => Some(n.to_string()),
			_ => None,
		}
	}
}

/// One raw `SetDelegate` / `ClearDelegate` log entry. The action is not part
/// of the record; it is implied by which dump file the record came from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDelegationLog {
	#[serde(rename = "blockNumber")]
	pub block_number: u64,
	#[serde(rename = "transactionIndex")]
	pub transaction_index: u64,
	#[serde(rename = "logIndex")]
	pub log_index: u64,
	pub args: DelegationArgs,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegationArgs {
	pub delegator: String,
	pub delegate: String,
	/// bytes32 space id, hex-encoded; all-zero means the wildcard space.
	pub id: String,
}
