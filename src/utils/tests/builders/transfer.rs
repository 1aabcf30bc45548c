//! Test helper utilities for transfer events
//!
//! - `TransferEventBuilder`: Builder for creating test TransferEvent instances

use crate::models::TransferEvent;

/// Builder for creating test TransferEvent instances
pub struct TransferEventBuilder {
	block_number: u64,
	transaction_hash: String,
	transaction_index: u64,
	log_index: u64,
	from: String,
	to: String,
	amount: f64,
}

impl Default for TransferEventBuilder {
	fn default() -> Self {
		Self {
			block_number: 1,
			transaction_hash: "0xdeadbeef".to_string(),
			transaction_index: 0,
			log_index: 0,
			from: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
			to: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
			amount: 1.0,
		}
	}
}

impl TransferEventBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn block(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}

	pub fn hash(mut self, transaction_hash: &str) -> Self {
		self.transaction_hash = transaction_hash.to_string();
		self
	}

	pub fn indices(mut self, transaction_index: u64, log_index: u64) -> Self {
		self.transaction_index = transaction_index;
		self.log_index = log_index;
		self
	}

	pub fn from(mut self, from: &str) -> Self {
		self.from = from.to_string();
		self
	}

	pub fn to(mut self, to: &str) -> Self {
		self.to = to.to_string();
		self
	}

	pub fn amount(mut self, amount: f64) -> Self {
		self.amount = amount;
		self
	}

	pub fn build(self) -> TransferEvent {
		TransferEvent {
			block_number: self.block_number,
			transaction_hash: self.transaction_hash,
			transaction_index: self.transaction_index,
			log_index: self.log_index,
			from: self.from,
			to: self.to,
			amount: self.amount,
		}
	}
}
