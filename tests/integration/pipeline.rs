use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use governance_ledger::bootstrap::{
	initialize_services, run_batch, run_token_pipeline, PipelineContext,
};
use governance_ledger::models::Token;
use governance_ledger::repositories::TokenRepository;
use governance_ledger::services::ledger::FileSnapshotStorage;

use crate::integration::mocks::MockSnapshotStorage;

fn write_shard(data_dir: &Path, token: &str, name: &str, lines: &[String]) {
	let dir = data_dir.join("transfer").join(token);
	std::fs::create_dir_all(&dir).unwrap();
	std::fs::write(dir.join(name), lines.join("\n") + "\n").unwrap();
}

fn raw_line(
	block: u64,
	hash: &str,
	tx_index: u64,
	log_index: u64,
	from: &str,
	to: &str,
	amount: &str,
) -> String {
	serde_json::json!({
		"blockNumber": block,
		"transactionHash": hash,
		"transactionIndex": tx_index,
		"logIndex": log_index,
		"args": {"from": from, "to": to, "amount": amount}
	})
	.to_string()
}

fn token(address: &str, targets: &[u64]) -> Token {
	Token {
		address: address.to_string(),
		decimals: Some(0),
		target_blocks: targets.to_vec(),
		staking_contracts: vec![],
		paused: false,
	}
}

fn context(data_dir: &Path, out_dir: &Path, labels: &[&str]) -> PipelineContext {
	PipelineContext {
		data_dir: data_dir.to_path_buf(),
		out_dir: out_dir.to_path_buf(),
		contract_labels: labels.iter().map(|l| l.to_string()).collect(),
	}
}

const TOKEN: &str = "0x27054b13b1b798b345b591a4d22e6562d47ea75a";
const WALLET_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const WALLET_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const WALLET_C: &str = "0xcccccccccccccccccccccccccccccccccccccccc";
const ROUTER: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

fn read_snapshot(out_dir: &Path, token: &str, block: u64) -> serde_json::Map<String, serde_json::Value> {
	let path = out_dir
		.join("holding")
		.join(token)
		.join(format!("{}_{}.json", token, block));
	let content = std::fs::read_to_string(&path)
		.unwrap_or_else(|_| panic!("missing snapshot {}", path.display()));
	serde_json::from_str(&content).unwrap()
}

fn holding_of(document: &serde_json::Map<String, serde_json::Value>, address: &str) -> f64 {
	document[address]["holding"].as_f64().unwrap()
}

#[tokio::test]
async fn test_full_pipeline_writes_expected_snapshots() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");

	// Events at blocks 10, 20, 30 each move 5 units from A to B, written
	// across two shards in non-chronological order
	write_shard(
		&data_dir,
		TOKEN,
		"shard_b.jsonl",
		&[raw_line(30, "0xh3", 0, 0, WALLET_A, WALLET_B, "5")],
	);
	write_shard(
		&data_dir,
		TOKEN,
		"shard_a.jsonl",
		&[
			raw_line(20, "0xh2", 0, 0, WALLET_A, WALLET_B, "5"),
			raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "5"),
		],
	);

	let token = token(TOKEN, &[15, 25, 35]);
	let context = context(&data_dir, &out_dir, &[]);
	let storage = FileSnapshotStorage::new(out_dir.clone());

	let summary = run_token_pipeline(&token, &context, &storage).await.unwrap();
	assert_eq!(summary.events, 3);
	assert_eq!(summary.transactions, 3);
	assert_eq!(summary.snapshots_written, 3);

	let at_15 = read_snapshot(&out_dir, TOKEN, 15);
	assert_eq!(holding_of(&at_15, WALLET_A), -5.0);
	assert_eq!(holding_of(&at_15, WALLET_B), 5.0);

	let at_25 = read_snapshot(&out_dir, TOKEN, 25);
	assert_eq!(holding_of(&at_25, WALLET_A), -10.0);
	assert_eq!(holding_of(&at_25, WALLET_B), 10.0);

	let at_35 = read_snapshot(&out_dir, TOKEN, 35);
	assert_eq!(holding_of(&at_35, WALLET_A), -15.0);
	assert_eq!(holding_of(&at_35, WALLET_B), 15.0);

	// Entries are ordered descending by holding
	let keys: Vec<&String> = at_35.keys().collect();
	assert_eq!(keys, vec![WALLET_B, WALLET_A]);

	// The normalized table and the per-token label set were persisted
	assert!(out_dir.join("transfer").join(format!("{}.csv", TOKEN)).exists());
	assert!(out_dir.join("contract").join(format!("{}.csv", TOKEN)).exists());
}

#[tokio::test]
async fn test_router_transaction_is_collapsed() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");

	// One transaction hops through a router: A -> router -> {B: 6, C: 4}
	write_shard(
		&data_dir,
		TOKEN,
		"shard.jsonl",
		&[
			raw_line(10, "0xswap", 0, 0, WALLET_A, ROUTER, "10"),
			raw_line(10, "0xswap", 0, 1, ROUTER, WALLET_B, "6"),
			raw_line(10, "0xswap", 0, 2, ROUTER, WALLET_C, "4"),
		],
	);

	let token = token(TOKEN, &[20]);
	let context = context(&data_dir, &out_dir, &[ROUTER]);
	let storage = FileSnapshotStorage::new(out_dir.clone());

	let summary = run_token_pipeline(&token, &context, &storage).await.unwrap();
	assert_eq!(summary.transactions, 1);

	let snapshot = read_snapshot(&out_dir, TOKEN, 20);
	assert_eq!(holding_of(&snapshot, WALLET_A), -10.0);
	assert_eq!(holding_of(&snapshot, WALLET_B), 6.0);
	assert_eq!(holding_of(&snapshot, WALLET_C), 4.0);
	// The pass-through router never appears as a holder
	assert!(!snapshot.contains_key(ROUTER));
}

#[tokio::test]
async fn test_staking_transfers_do_not_move_balances() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");
	let staking = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

	write_shard(
		&data_dir,
		TOKEN,
		"shard.jsonl",
		&[
			raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "8"),
			raw_line(20, "0xh2", 0, 0, WALLET_B, staking, "8"),
			raw_line(30, "0xh3", 0, 0, staking, WALLET_C, "3"),
		],
	);

	let mut token = token(TOKEN, &[40]);
	token.staking_contracts = vec![staking.to_string()];
	let context = context(&data_dir, &out_dir, &[]);
	let storage = FileSnapshotStorage::new(out_dir.clone());

	let summary = run_token_pipeline(&token, &context, &storage).await.unwrap();
	assert_eq!(summary.edges_skipped, 2);

	let snapshot = read_snapshot(&out_dir, TOKEN, 40);
	// Only the first transfer moved balances; the wrap and unwrap did not
	assert_eq!(holding_of(&snapshot, WALLET_A), -8.0);
	assert_eq!(holding_of(&snapshot, WALLET_B), 8.0);
	assert!(!snapshot.contains_key(staking));
	assert!(!snapshot.contains_key(WALLET_C));
}

#[tokio::test]
async fn test_pipeline_is_deterministic() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");

	write_shard(
		&data_dir,
		TOKEN,
		"shard.jsonl",
		&[
			raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "7"),
			raw_line(12, "0xh2", 0, 0, WALLET_B, WALLET_C, "2"),
			raw_line(30, "0xh3", 0, 0, WALLET_C, WALLET_A, "1"),
		],
	);

	let token = token(TOKEN, &[11, 20, 40]);
	let mut outputs = Vec::new();
	for run in 0..2 {
		let out_dir = dir.path().join(format!("out_{}", run));
		let context = context(&data_dir, &out_dir, &[]);
		let storage = FileSnapshotStorage::new(out_dir.clone());
		run_token_pipeline(&token, &context, &storage).await.unwrap();

		let mut bytes = Vec::new();
		for block in [11u64, 20, 40] {
			let path = out_dir
				.join("holding")
				.join(TOKEN)
				.join(format!("{}_{}.json", TOKEN, block));
			bytes.push(std::fs::read(path).unwrap());
		}
		outputs.push(bytes);
	}
	assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_conservation_violation_fails_token_but_not_batch() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");

	// Token 1 carries a transaction whose float loss breaks conservation:
	// 2^53 swallows a +1 on the source side while the sink side keeps a 2
	let poisoned = "0x1111111111111111111111111111111111111111";
	write_shard(
		&data_dir,
		poisoned,
		"shard.jsonl",
		&[
			raw_line(10, "0xbig", 0, 0, WALLET_A, WALLET_B, "9007199254740992"),
			raw_line(10, "0xbig", 0, 1, WALLET_A, WALLET_C, "1"),
			raw_line(10, "0xbig", 0, 2, ROUTER, WALLET_C, "1"),
		],
	);

	let healthy = "0x2222222222222222222222222222222222222222";
	write_shard(
		&data_dir,
		healthy,
		"shard.jsonl",
		&[raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "5")],
	);

	let tokens = vec![token(poisoned, &[20]), token(healthy, &[20])];
	let context = Arc::new(context(&data_dir, &out_dir, &[]));
	let storage = Arc::new(FileSnapshotStorage::new(out_dir.clone()));

	let manifest = run_batch(tokens, context, storage).await.unwrap();
	assert_eq!(manifest.tokens.len(), 1);
	assert_eq!(manifest.failures.len(), 1);
	assert_eq!(manifest.failures[0].token, poisoned);
	assert!(manifest.failures[0].error.contains("Conservation violation"));

	// The healthy token's snapshot exists, the poisoned one's does not
	assert!(out_dir.join("holding").join(healthy).exists());
	assert!(!out_dir.join("holding").join(poisoned).exists());
}

#[tokio::test]
async fn test_missing_targets_fails_token_with_history() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");

	write_shard(
		&data_dir,
		TOKEN,
		"shard.jsonl",
		&[raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "5")],
	);

	let token = token(TOKEN, &[]);
	let context = context(&data_dir, &out_dir, &[]);
	let storage = FileSnapshotStorage::new(out_dir.clone());

	let result = run_token_pipeline(&token, &context, &storage).await;
	assert!(result.is_err());
	assert!(result.unwrap_err().to_string().contains("Missing targets"));
}

#[tokio::test]
async fn test_snapshots_flow_through_the_storage_trait() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");

	write_shard(
		&data_dir,
		TOKEN,
		"shard.jsonl",
		&[raw_line(10, "0xh1", 0, 0, WALLET_A, WALLET_B, "5")],
	);

	let token = token(TOKEN, &[15, 25]);
	let context = context(&data_dir, &out_dir, &[]);

	let mut storage = MockSnapshotStorage::new();
	storage
		.expect_save_snapshot()
		.times(2)
		.returning(|_| Ok(()));

	let summary = run_token_pipeline(&token, &context, &storage).await.unwrap();
	assert_eq!(summary.snapshots_written, 2);
}

#[test]
fn test_initialize_services_loads_configs_and_labels() {
	let dir = tempfile::tempdir().unwrap();
	let config_dir = dir.path().join("config").join("tokens");
	std::fs::create_dir_all(&config_dir).unwrap();

	std::fs::write(
		config_dir.join("airswap.json"),
		serde_json::json!({
			"address": TOKEN,
			"decimals": 4,
			"target_blocks": [4352086]
		})
		.to_string(),
	)
	.unwrap();
	// Invalid configs are skipped, not fatal
	std::fs::write(
		config_dir.join("broken.json"),
		r#"{"address": "nope", "target_blocks": []}"#,
	)
	.unwrap();

	let label_dir = dir.path().join("data").join("labels");
	std::fs::create_dir_all(&label_dir).unwrap();
	std::fs::write(
		label_dir.join("contracts.csv"),
		format!("ADDRESS\n{}\n", ROUTER.to_uppercase().replace("0X", "0x")),
	)
	.unwrap();

	let (token_service, labels) = initialize_services::<TokenRepository>(
		Some(&config_dir),
		Some(&label_dir.join("contracts.csv")),
	)
	.unwrap();

	let tokens = token_service.get_all();
	assert_eq!(tokens.len(), 1);
	assert!(token_service.get("airswap").is_some());
	assert!(token_service.get_by_address(TOKEN).is_some());

	let expected: HashSet<String> = HashSet::from([ROUTER.to_string()]);
	assert_eq!(labels, expected);
}
