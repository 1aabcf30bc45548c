//! Governance token ledger batch entry point.
//!
//! This binary reconstructs per-wallet governance-token balances from raw
//! on-chain `Transfer` event dumps and writes point-in-time holding
//! snapshots at configured target blocks.
//!
//! # Flow
//! 1. Loads token configurations and the global contract label set
//! 2. Per token: normalizes raw transfer shards, persists the canonical
//!    tables, aggregates router transactions, replays the flow stream and
//!    writes one snapshot file per target block
//! 3. Builds delegation state snapshots when delegation dumps are present
//! 4. With `--classify`, instead runs a one-shot whale / non-whale
//!    classification against an already-written snapshot

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Arg, Command};
use dotenvy::dotenv;
use std::env::{set_var, var};
use tracing::{error, info};

use governance_ledger::{
	bootstrap::{
		execute_classification, filter_active_tokens, initialize_services, run_batch,
		run_delegation_pipeline, PipelineContext, Result,
	},
	models::Token,
	repositories::TokenRepository,
	services::ledger::FileSnapshotStorage,
	utils::{
		constants::{DEFAULT_CONFIG_DIR, DEFAULT_DATA_DIR, DEFAULT_OUT_DIR, WHALE_THRESHOLD},
		logging::setup_logging,
	},
};

/// Main entry point for the ledger batch.
///
/// # Errors
/// Returns an error if service initialization fails or the selected mode
/// cannot complete.
#[tokio::main]
async fn main() -> Result<()> {
	// Initialize command-line interface
	let matches = Command::new("governance-ledger")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Reconstructs per-wallet governance token balances from on-chain transfer \
			 dumps and classifies holders into whale and non-whale participants.",
		)
		.arg(
			Arg::new("config-path")
				.long("config-path")
				.help("Directory holding per-token JSON configs (default: config/tokens)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("data-path")
				.long("data-path")
				.help("Root of the raw fetched data tree (default: data)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("out-path")
				.long("out-path")
				.help("Root of the processed output tree (default: out)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("token")
				.long("token")
				.help("Restrict the run to one token contract address")
				.value_name("ADDRESS"),
		)
		.arg(
			Arg::new("classify")
				.long("classify")
				.help("Classify holders against an already-written snapshot")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("block")
				.long("block")
				.help("Target block of the snapshot to classify")
				.value_name("BLOCK_NUMBER"),
		)
		.arg(
			Arg::new("space")
				.long("space")
				.help("Governance space used to resolve delegations (default: all)")
				.value_name("SPACE"),
		)
		.arg(
			Arg::new("whale-threshold")
				.long("whale-threshold")
				.help("Holding share that makes a wallet a whale (default: 0.05)")
				.value_name("FRACTION"),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config_path = matches
		.get_one::<String>("config-path")
		.map(|s| s.to_string())
		.unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
	let data_path = matches
		.get_one::<String>("data-path")
		.map(|s| s.to_string())
		.unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
	let out_path = matches
		.get_one::<String>("out-path")
		.map(|s| s.to_string())
		.unwrap_or_else(|| DEFAULT_OUT_DIR.to_string());

	let label_path = Path::new(&data_path).join("labels").join("contracts.csv");
	let (token_service, contract_labels) = initialize_services::<TokenRepository>(
		Some(Path::new(&config_path)),
		Some(&label_path),
	)
	.map_err(|e| {
		anyhow::anyhow!(
			"Failed to initialize services: {}. Check the token config directory and the \
			 contract label file.",
			e
		)
	})?;

	let tokens: HashMap<String, Token> = token_service.get_all();
	let token_filter = matches.get_one::<String>("token").map(|s| s.to_lowercase());
	let mut selected: Vec<Token> = tokens
		.into_values()
		.filter(|t| {
			token_filter
				.as_ref()
				.map(|f| t.address.to_lowercase() == *f)
				.unwrap_or(true)
		})
		.collect();
	// Deterministic processing order regardless of config discovery order
	selected.sort_by(|a, b| a.address.cmp(&b.address));

	if selected.is_empty() {
		info!("No tokens selected. Exiting...");
		return Ok(());
	}

	let context = PipelineContext {
		data_dir: PathBuf::from(&data_path),
		out_dir: PathBuf::from(&out_path),
		contract_labels,
	};

	let whale_threshold = matches
		.get_one::<String>("whale-threshold")
		.map(|s| {
			s.parse::<f64>().map_err(|e| {
				error!("Failed to parse whale threshold: {}", e);
				e
			})
		})
		.transpose()?
		.unwrap_or(WHALE_THRESHOLD);

	// One-shot classification mode
	if matches.get_flag("classify") {
		let block = matches
			.get_one::<String>("block")
			.ok_or(anyhow::anyhow!(
				"--block must be provided when classifying a snapshot"
			))?
			.parse::<u64>()
			.map_err(|e| anyhow::anyhow!("Failed to parse block number: {}", e))?;
		if token_filter.is_none() {
			return Err(anyhow::anyhow!(
				"--token must be provided when classifying a snapshot"
			)
			.into());
		}
		let token = selected.first().cloned().ok_or(anyhow::anyhow!(
			"--token must select a configured token when classifying"
		))?;
		let space = matches
			.get_one::<String>("space")
			.map(|s| s.to_string())
			.unwrap_or_else(|| "all".to_string());

		let summary =
			execute_classification(&token, block, &space, whale_threshold, &context).await?;

		info!("=========== Classification Results ===========");
		info!("Token: {}", token.address);
		info!("Block: {}", block);
		info!("Holders: {}", summary.holder_num);
		info!(
			"Whales: {} ({} voted)",
			summary.whale_num, summary.whale_vote_num
		);
		info!(
			"Non-whales: {} ({} voted)",
			summary.non_whale_num, summary.non_whale_vote_num
		);
		if summary.unknown_voter_num > 0 {
			info!("Voters without holdings: {}", summary.unknown_voter_num);
		}
		if let Some(turnout) = summary.whale_turnout {
			info!("Whale turnout: {:.4}", turnout);
		}
		if let Some(turnout) = summary.non_whale_turnout {
			info!("Non-whale turnout: {:.4}", turnout);
		}
		if let Some(hhi) = summary.whale_hhi {
			info!("Whale choice HHI: {:.4}", hhi);
		}
		if let Some(hhi) = summary.non_whale_hhi {
			info!("Non-whale choice HHI: {:.4}", hhi);
		}
		info!("==============================================");
		return Ok(());
	}

	// Batch mode
	let active_tokens = filter_active_tokens(selected);
	if active_tokens.is_empty() {
		info!("No active tokens to process. Exiting...");
		return Ok(());
	}

	let context = Arc::new(context);
	let storage = Arc::new(FileSnapshotStorage::new(context.out_dir.clone()));

	run_delegation_pipeline(&context, &active_tokens).await?;
	let manifest = run_batch(active_tokens, context.clone(), storage).await?;

	if !manifest.failures.is_empty() {
		error!(
			"{} of {} tokens failed; see run manifest",
			manifest.failures.len(),
			manifest.failures.len() + manifest.tokens.len()
		);
	}

	info!("Batch finished");
	Ok(())
}
