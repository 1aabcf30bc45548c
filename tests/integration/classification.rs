use std::path::Path;

use governance_ledger::bootstrap::{
	execute_classification, run_delegation_pipeline, run_token_pipeline, PipelineContext,
};
use governance_ledger::models::Token;
use governance_ledger::services::ledger::FileSnapshotStorage;
use governance_ledger::utils::constants::WHALE_THRESHOLD;

const TOKEN: &str = "0x27054b13b1b798b345b591a4d22e6562d47ea75a";
const WHALE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const DELEGATOR: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const DELEGATEE: &str = "0xcccccccccccccccccccccccccccccccccccccccc";
const TREASURY: &str = "0xdddddddddddddddddddddddddddddddddddddddd";

fn write_fixtures(data_dir: &Path) {
	// Treasury seeds three wallets; the treasury itself is a labeled contract
	let shard_dir = data_dir.join("transfer").join(TOKEN);
	std::fs::create_dir_all(&shard_dir).unwrap();
	let lines: Vec<String> = [
		(10u64, "0xh1", WHALE, "600"),
		(11, "0xh2", DELEGATOR, "30"),
		(12, "0xh3", DELEGATEE, "370"),
	]
	.iter()
	.map(|(block, hash, to, amount)| {
		serde_json::json!({
			"blockNumber": block,
			"transactionHash": hash,
			"transactionIndex": 0,
			"logIndex": 0,
			"args": {"from": TREASURY, "to": to, "amount": amount}
		})
		.to_string()
	})
	.collect();
	std::fs::write(shard_dir.join("shard.jsonl"), lines.join("\n") + "\n").unwrap();

	let label_dir = data_dir.join("labels");
	std::fs::create_dir_all(&label_dir).unwrap();
	std::fs::write(
		label_dir.join("contracts.csv"),
		format!("address\n{}\n", TREASURY),
	)
	.unwrap();

	// The delegator hands its weight to the delegatee for every space
	let delegation_dir = data_dir.join("delegation");
	std::fs::create_dir_all(&delegation_dir).unwrap();
	let zero_id = format!("0x{}", "0".repeat(64));
	std::fs::write(
		delegation_dir.join("set.jsonl"),
		format!(
			"{}\n",
			serde_json::json!({
				"blockNumber": 15,
				"transactionIndex": 0,
				"logIndex": 0,
				"args": {"delegator": DELEGATOR, "delegate": DELEGATEE, "id": zero_id}
			})
		),
	)
	.unwrap();

	let votes_dir = data_dir.join("votes");
	std::fs::create_dir_all(&votes_dir).unwrap();
	std::fs::write(
		votes_dir.join(format!("{}.csv", TOKEN)),
		format!(
			"voter,choice,vp\n{},1,600\n{},1,400\n",
			WHALE, DELEGATEE
		),
	)
	.unwrap();
}

fn token() -> Token {
	Token {
		address: TOKEN.to_string(),
		decimals: Some(0),
		target_blocks: vec![20],
		staking_contracts: vec![],
		paused: false,
	}
}

#[tokio::test]
async fn test_classification_over_written_artifacts() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");
	write_fixtures(&data_dir);

	let context = PipelineContext {
		data_dir: data_dir.clone(),
		out_dir: out_dir.clone(),
		contract_labels: std::collections::HashSet::from([TREASURY.to_string()]),
	};
	let storage = FileSnapshotStorage::new(out_dir.clone());
	let token = token();

	run_token_pipeline(&token, &context, &storage).await.unwrap();
	let delegation_snapshots = run_delegation_pipeline(&context, std::slice::from_ref(&token))
		.await
		.unwrap();
	assert_eq!(delegation_snapshots, 1);

	let summary = execute_classification(&token, 20, "all", WHALE_THRESHOLD, &context)
		.await
		.unwrap();

	// The treasury is a contract and out of the filtered pool; total is
	// 1000 across whale 600, delegator 30, delegatee 370
	assert_eq!(summary.holder_num, 3);
	assert_eq!(summary.whale_num, 2);
	assert_eq!(summary.non_whale_num, 1);
	// The non-voting delegator's holding moved to the delegatee, so both
	// remaining wallets voted
	assert_eq!(summary.whale_vote_num, 2);
	assert_eq!(summary.non_whale_vote_num, 0);
	assert_eq!(summary.unknown_voter_num, 0);
	assert_eq!(summary.whale_turnout, Some(1.0));
	// Both whale votes went to the same choice
	assert_eq!(summary.whale_hhi, Some(1.0));
}

#[tokio::test]
async fn test_missing_snapshot_is_reported_not_fabricated() {
	let dir = tempfile::tempdir().unwrap();
	let data_dir = dir.path().join("data");
	let out_dir = dir.path().join("out");
	std::fs::create_dir_all(&data_dir).unwrap();

	let context = PipelineContext {
		data_dir,
		out_dir,
		contract_labels: std::collections::HashSet::new(),
	};

	let result = execute_classification(&token(), 999, "all", WHALE_THRESHOLD, &context).await;
	assert!(result.is_err());
	assert!(result
		.unwrap_err()
		.to_string()
		.contains("Snapshot missing"));
}
