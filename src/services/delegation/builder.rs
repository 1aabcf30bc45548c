use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::models::{
    DelegationAction, DelegationEvent, DelegationState, RawDelegationLog, WILDCARD_SPACE,
};
use crate::services::delegation::DelegationError;
use crate::utils::parsing::normalize_address;

/// Decode a bytes32 space id into the space name.
///
/// The all-zero id is the wildcard space; otherwise the bytes are NUL-padded
/// UTF-8. Undecodable ids yield `None` and the event is dropped.
pub fn decode_space(id: &str) -> Option<String> {
    let hex_part = id.strip_prefix("0x").unwrap_or(id);
    if !hex_part.is_empty() && hex_part.chars().all(|c| c == '0') {
        return Some(WILDCARD_SPACE.to_string());
    }
    let bytes = hex::decode(hex_part).ok()?;
    let decoded = std::str::from_utf8(&bytes).ok()?;
    Some(decoded.trim_end_matches('\0').to_string())
}

/// Replays delegation event dumps into per-block delegation states.
pub struct DelegationBuilder;

impl DelegationBuilder {
    pub fn new() -> Self {
        DelegationBuilder
    }

    /// Load `set.jsonl` and `clear.jsonl` dumps from `dump_dir` and return
    /// the merged event sequence in chronological order. Events whose space
    /// id does not decode are dropped.
    pub fn load_events(&self, dump_dir: &Path) -> Result<Vec<DelegationEvent>, DelegationError> {
        let mut events = Vec::new();
        for (file_name, action) in [
            ("set.jsonl", DelegationAction::Set),
            ("clear.jsonl", DelegationAction::Clear),
        ] {
            let path = dump_dir.join(file_name);
            if !path.exists() {
                continue;
            }
            self.read_dump(&path, action, &mut events)?;
        }
        // Stable sort: records of one dump keep their relative order on ties
        events.sort_by_key(|e| e.ordering_key());
        Ok(events)
    }

    fn read_dump(
        &self,
        path: &Path,
        action: DelegationAction,
        events: &mut Vec<DelegationEvent>,
    ) -> Result<(), DelegationError> {
        let file = File::open(path)?;
        let mut dropped = 0usize;
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawDelegationLog = serde_json::from_str(&line).map_err(|e| {
                DelegationError::parse_error(format!(
                    "{}:{}: {}",
                    path.display(),
                    line_number + 1,
                    e
                ))
            })?;
            let Some(space) = decode_space(&raw.args.id) else {
                dropped += 1;
                continue;
            };
            events.push(DelegationEvent {
                block_number: raw.block_number,
                transaction_index: raw.transaction_index,
                log_index: raw.log_index,
                delegator: normalize_address(&raw.args.delegator),
                delegatee: normalize_address(&raw.args.delegate),
                space,
                action,
            });
        }
        if dropped > 0 {
            warn!(path = %path.display(), dropped, "dropped events with undecodable space ids");
        }
        Ok(())
    }

    /// Replay the sorted event sequence, returning the delegation state at
    /// each target block. Targets are flushed before the first event whose
    /// block exceeds them; remaining targets get the terminal state.
    pub fn replay(
        &self,
        events: &[DelegationEvent],
        target_blocks: &[u64],
    ) -> Vec<(u64, DelegationState)> {
        let mut targets: Vec<u64> = target_blocks.to_vec();
        targets.sort_unstable();
        targets.dedup();

        let mut state = DelegationState::new();
        let mut outputs = Vec::with_capacity(targets.len());
        let mut next_target = 0usize;

        for event in events {
            if next_target >= targets.len() {
                break;
            }
            while next_target < targets.len() && event.block_number > targets[next_target] {
                outputs.push((targets[next_target], state.clone()));
                next_target += 1;
            }
            if next_target >= targets.len() {
                break;
            }

            match event.action {
                DelegationAction::Set => {
                    state
                        .entry(event.delegator.clone())
                        .or_default()
                        .insert(event.space.clone(), event.delegatee.clone());
                }
                DelegationAction::Clear => {
                    if let Some(spaces) = state.get_mut(&event.delegator) {
                        spaces.remove(&event.space);
                    }
                }
            }
        }

        for &target in &targets[next_target..] {
            outputs.push((target, state.clone()));
        }

        debug!(
            events = events.len(),
            snapshots = outputs.len(),
            "delegation replay complete"
        );
        outputs
    }
}

impl Default for DelegationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
