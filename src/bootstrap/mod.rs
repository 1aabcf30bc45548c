//! Bootstrap module for initializing services and running the batch pipeline.
//!
//! This module wires the repositories and engines together and drives the
//! per-token pipeline:
//!
//! 1. Normalize raw transfer shards into the canonical sequence
//! 2. Persist the normalized table and the per-token contract label set
//! 3. Aggregate router transactions into net flows
//! 4. Replay the flow stream and write holding snapshots
//!
//! Tokens are independent, so the batch fans out one task per token and
//! joins them; a failing token is reported and skipped, never aborting the
//! rest of the batch.

use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
	models::Token,
	repositories::{
		ContractLabelRepository, ContractLabelRepositoryTrait, TokenRepositoryTrait, TokenService,
		VoteRepository, VoteRepositoryTrait,
	},
	services::{
		aggregator::RouterFlowAggregator,
		classifier::{ClassifierError, ParticipantClassifier, ParticipationSummary},
		delegation::{DelegationBuilder, DelegationStorage, FileDelegationStorage},
		ledger::{replay, BalanceLedger, FileSnapshotStorage, LedgerError, SnapshotStorage},
		normalizer::TransferNormalizer,
	},
};

/// Type alias for handling service results
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Shared, read-only inputs of one batch run.
pub struct PipelineContext {
	pub data_dir: PathBuf,
	pub out_dir: PathBuf,
	pub contract_labels: HashSet<String>,
}

/// Per-token result recorded in the run manifest.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRunSummary {
	pub token: String,
	pub events: usize,
	pub transactions: usize,
	pub snapshots_written: usize,
	pub edges_skipped: usize,
}

/// Written next to the snapshot tree after each batch run.
#[derive(Debug, Serialize)]
pub struct RunManifest {
	pub started_at: String,
	pub finished_at: String,
	pub tokens: Vec<TokenRunSummary>,
	pub failures: Vec<RunFailure>,
}

#[derive(Debug, Serialize)]
pub struct RunFailure {
	pub token: String,
	pub error: String,
}

/// Initializes the token service and the global contract label set.
///
/// # Errors
/// Returns an error if the token config directory or the label file cannot
/// be loaded.
pub fn initialize_services<T: TokenRepositoryTrait>(
	config_path: Option<&Path>,
	label_path: Option<&Path>,
) -> Result<(TokenService<T>, HashSet<String>)> {
	let repository = T::new(config_path)?;
	let token_service = TokenService::new_with_repository(repository)?;
	let labels = ContractLabelRepository::new(label_path)?.get_all();
	Ok((token_service, labels))
}

/// Drop paused tokens and tokens whose decimals could not be resolved.
///
/// An unresolvable-decimals token is excluded from processing entirely
/// (fail-soft): the amounts of its transfer log cannot be scaled.
pub fn filter_active_tokens(tokens: Vec<Token>) -> Vec<Token> {
	tokens
		.into_iter()
		.filter(|token| {
			if token.paused {
				info!(token = %token.address, "skipping paused token");
				return false;
			}
			if token.decimals.is_none() {
				warn!(
					token = %token.address,
					"dropping token with unresolved decimals"
				);
				return false;
			}
			true
		})
		.collect()
}

/// Run the full pipeline for one token: normalize, persist, aggregate,
/// replay, write snapshots.
pub async fn run_token_pipeline<S: SnapshotStorage>(
	token: &Token,
	context: &PipelineContext,
	storage: &S,
) -> Result<TokenRunSummary> {
	let decimals = token
		.decimals
		.ok_or_else(|| format!("token {} has no decimals", token.address))?;

	let normalizer = TransferNormalizer::new();
	let shard_dir = context.data_dir.join("transfer").join(&token.address);
	let events = normalizer.normalize_token(&shard_dir, decimals)?;

	if events.is_empty() {
		info!(token = %token.address, "no transfer history, nothing to do");
		return Ok(TokenRunSummary {
			token: token.address.clone(),
			events: 0,
			transactions: 0,
			snapshots_written: 0,
			edges_skipped: 0,
		});
	}

	let transfer_dir = context.out_dir.join("transfer");
	let contract_dir = context.out_dir.join("contract");
	std::fs::create_dir_all(&transfer_dir)?;
	std::fs::create_dir_all(&contract_dir)?;

	normalizer.write_transfer_csv(
		&events,
		&transfer_dir.join(format!("{}.csv", token.address)),
	)?;
	let labels = normalizer.extract_contract_labels(&events, &context.contract_labels);
	normalizer.write_label_csv(
		&labels,
		&contract_dir.join(format!("{}.csv", token.address)),
	)?;

	let aggregator = RouterFlowAggregator::new();
	let flows = aggregator.aggregate_stream(&events)?;

	let staking_contracts = token.staking_set();
	let contract_set: HashSet<String> = labels.into_iter().collect();
	let mut ledger = BalanceLedger::new();
	let outcome = replay(
		&mut ledger,
		&token.address,
		&flows,
		&token.target_blocks,
		&staking_contracts,
		&contract_set,
	)?;

	for snapshot in &outcome.snapshots {
		storage
			.save_snapshot(snapshot)
			.await
			.map_err(|e| LedgerError::storage_error(e.to_string()))?;
	}

	Ok(TokenRunSummary {
		token: token.address.clone(),
		events: events.len(),
		transactions: flows.len(),
		snapshots_written: outcome.snapshots.len(),
		edges_skipped: outcome.edges_skipped,
	})
}

/// Run every token's pipeline concurrently and write the run manifest.
pub async fn run_batch(
	tokens: Vec<Token>,
	context: Arc<PipelineContext>,
	storage: Arc<FileSnapshotStorage>,
) -> Result<RunManifest> {
	let started_at = Utc::now().to_rfc3339();

	let handles = tokens.into_iter().map(|token| {
		let context = context.clone();
		let storage = storage.clone();
		tokio::spawn(async move {
			// Errors cross the task boundary as strings; the trait objects
			// underneath are not Send
			let result = run_token_pipeline(&token, &context, storage.as_ref())
				.await
				.map_err(|e| e.to_string());
			(token.address.clone(), result)
		})
	});

	let mut summaries = Vec::new();
	let mut failures = Vec::new();
	for joined in join_all(handles).await {
		match joined {
			Ok((_, Ok(summary))) => summaries.push(summary),
			Ok((token, Err(e))) => {
				error!(token = %token, error = %e, "token pipeline failed");
				failures.push(RunFailure { token, error: e });
			}
			Err(e) => {
				error!(error = %e, "token pipeline task panicked");
				failures.push(RunFailure {
					token: "unknown".to_string(),
					error: e.to_string(),
				});
			}
		}
	}

	let manifest = RunManifest {
		started_at,
		finished_at: Utc::now().to_rfc3339(),
		tokens: summaries,
		failures,
	};

	std::fs::create_dir_all(&context.out_dir)?;
	std::fs::write(
		context.out_dir.join("run_manifest.json"),
		serde_json::to_string_pretty(&manifest)?,
	)?;

	info!(
		tokens = manifest.tokens.len(),
		failures = manifest.failures.len(),
		"batch complete"
	);
	Ok(manifest)
}

/// Build delegation state snapshots from the delegation event dumps, using
/// the union of every active token's target blocks. A missing dump
/// directory simply skips the step.
pub async fn run_delegation_pipeline(
	context: &PipelineContext,
	tokens: &[Token],
) -> Result<usize> {
	let dump_dir = context.data_dir.join("delegation");
	if !dump_dir.exists() {
		info!("no delegation dumps present, skipping delegation snapshots");
		return Ok(0);
	}

	let targets: BTreeSet<u64> = tokens
		.iter()
		.flat_map(|t| t.target_blocks.iter().copied())
		.collect();
	if targets.is_empty() {
		warn!("delegation dumps present but no target blocks configured");
		return Ok(0);
	}

	let builder = DelegationBuilder::new();
	let events = builder.load_events(&dump_dir)?;
	let target_list: Vec<u64> = targets.into_iter().collect();
	let states = builder.replay(&events, &target_list);

	let storage = FileDelegationStorage::new(context.out_dir.clone());
	for (block, state) in &states {
		storage.save_state(*block, state).await?;
	}

	info!(snapshots = states.len(), "wrote delegation snapshots");
	Ok(states.len())
}

/// One-shot classification of a written snapshot: load the holding snapshot
/// and the delegation state for `block`, the token's vote table, and report
/// the participation summary.
pub async fn execute_classification(
	token: &Token,
	block: u64,
	space: &str,
	whale_threshold: f64,
	context: &PipelineContext,
) -> Result<ParticipationSummary> {
	let snapshot_storage = FileSnapshotStorage::new(context.out_dir.clone());
	let snapshot = snapshot_storage
		.load_snapshot(&token.address, block)
		.await?
		.ok_or_else(|| {
			ClassifierError::snapshot_missing(format!(
				"no holding snapshot for token {} at block {}",
				token.address, block
			))
		})?;

	let delegation_storage = FileDelegationStorage::new(context.out_dir.clone());
	let delegation_state = delegation_storage.load_state(block).await?;

	let vote_repository = VoteRepository::new(Some(&context.data_dir.join("votes")))?;
	let votes = vote_repository.load(&token.address)?;
	let voters: HashSet<String> = votes.iter().map(|v| v.voter.clone()).collect();

	let classifier = ParticipantClassifier::with_threshold(whale_threshold);
	let holdings = classifier.merge_snapshots(std::slice::from_ref(&snapshot));
	let classification = classifier.classify(
		&holdings,
		delegation_state.as_ref(),
		space,
		&voters,
	);
	let summary = classifier.summarize(&classification, &votes);

	info!(
		token = %token.address,
		block,
		holders = summary.holder_num,
		whales = summary.whale_num,
		non_whales = summary.non_whale_num,
		"classification complete"
	);
	Ok(summary)
}
