//! Parsing utilities
//!
//! Address normalization and raw token amount conversion.

use alloy::primitives::U256;

/// Lowercase an address string, keeping the `0x` prefix.
///
/// All downstream state (ledgers, snapshots, label sets) is keyed by the
/// lowercased form.
pub fn normalize_address(address: &str) -> String {
	address.trim().replace(' ', "").to_lowercase()
}

/// Parse a raw uint256 amount from its decimal string form.
///
/// Rejects signs, exponents, and anything that does not fit a uint256;
/// the raw value is a token base-unit count straight out of the event log.
pub fn parse_raw_amount(raw: &str) -> Result<U256, String> {
	U256::from_str_radix(raw.trim(), 10)
		.map_err(|e| format!("Invalid raw amount '{}': {}", raw, e))
}

/// Convert a raw uint256 amount string into a decimal token amount.
///
/// The raw integer string is rounded to the nearest double and divided by
/// `10^decimals`, matching the float semantics of the historical outputs
/// this pipeline must reproduce.
pub fn scale_amount(raw: &str, decimals: u32) -> Result<f64, String> {
	parse_raw_amount(raw)?;
	let value: f64 = raw
		.trim()
		.parse()
		.map_err(|e| format!("Invalid raw amount '{}': {}", raw, e))?;
	Ok(value / 10f64.powi(decimals as i32))
}
