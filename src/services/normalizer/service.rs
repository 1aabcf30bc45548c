use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glob::glob;
use tracing::{debug, info};

use crate::models::{RawTransferLog, TransferEvent};
use crate::services::normalizer::NormalizerError;
use crate::utils::parsing::{normalize_address, scale_amount};

/// Normalizes raw fetched transfer shards into the canonical per-token
/// sequence.
///
/// Shards are block-range chunks fetched in any order; the output is a
/// single sequence sorted ascending by
/// `(block_number, transaction_index, log_index)`, with lowercased
/// addresses and amounts divided by the token's decimal precision.
pub struct TransferNormalizer;

impl TransferNormalizer {
    pub fn new() -> Self {
        TransferNormalizer
    }

    /// Read every `*.jsonl` shard under `shard_dir` and produce the sorted
    /// normalized sequence. A missing or empty shard directory yields an
    /// empty sequence (the token simply has no transfer history).
    pub fn normalize_token(
        &self,
        shard_dir: &Path,
        decimals: u32,
    ) -> Result<Vec<TransferEvent>, NormalizerError> {
        let pattern = shard_dir.join("*.jsonl").to_string_lossy().to_string();
        let paths =
            glob(&pattern).map_err(|e| NormalizerError::file_error(e.to_string()))?;

        let mut events = Vec::new();
        let mut shard_count = 0usize;
        for entry in paths {
            let path = entry.map_err(|e| NormalizerError::file_error(e.to_string()))?;
            shard_count += 1;
            self.read_shard(&path, decimals, &mut events)?;
        }

        events.sort_by_key(|e| e.ordering_key());

        debug!(
            shards = shard_count,
            events = events.len(),
            dir = %shard_dir.display(),
            "normalized transfer shards"
        );
        Ok(events)
    }

    fn read_shard(
        &self,
        path: &Path,
        decimals: u32,
        events: &mut Vec<TransferEvent>,
    ) -> Result<(), NormalizerError> {
        let file = File::open(path)?;
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawTransferLog = serde_json::from_str(&line).map_err(|e| {
                NormalizerError::parse_error(format!(
                    "{}:{}: {}",
                    path.display(),
                    line_number + 1,
                    e
                ))
            })?;
            events.push(self.normalize_log(raw, decimals)?);
        }
        Ok(())
    }

    fn normalize_log(
        &self,
        raw: RawTransferLog,
        decimals: u32,
    ) -> Result<TransferEvent, NormalizerError> {
        let raw_amount = raw.args.raw_amount().ok_or_else(|| {
            NormalizerError::amount_error(format!(
                "transfer {} log {} has a non-numeric amount",
                raw.transaction_hash, raw.log_index
            ))
        })?;
        let amount =
            scale_amount(&raw_amount, decimals).map_err(NormalizerError::amount_error)?;

        Ok(TransferEvent {
            block_number: raw.block_number,
            transaction_hash: raw.transaction_hash,
            transaction_index: raw.transaction_index,
            log_index: raw.log_index,
            from: normalize_address(&raw.args.from),
            to: normalize_address(&raw.args.to),
            amount,
        })
    }

    /// Addresses seen in the transfer stream that the global label set knows
    /// to be smart contracts, in sorted order.
    pub fn extract_contract_labels(
        &self,
        events: &[TransferEvent],
        global_labels: &HashSet<String>,
    ) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();
        for event in events {
            if global_labels.contains(&event.from) {
                labels.insert(event.from.clone());
            }
            if global_labels.contains(&event.to) {
                labels.insert(event.to.clone());
            }
        }
        labels
    }

    /// Persist the normalized sequence as a CSV table.
    pub fn write_transfer_csv(
        &self,
        events: &[TransferEvent],
        path: &Path,
    ) -> Result<(), NormalizerError> {
        let mut writer = csv::Writer::from_path(path)?;
        for event in events {
            writer.serialize(event)?;
        }
        writer.flush()?;
        info!(events = events.len(), path = %path.display(), "wrote normalized transfers");
        Ok(())
    }

    /// Persist the per-token contract label set as a single-column CSV.
    pub fn write_label_csv(
        &self,
        labels: &BTreeSet<String>,
        path: &Path,
    ) -> Result<(), NormalizerError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["address"])?;
        for label in labels {
            writer.write_record([label.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for TransferNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
