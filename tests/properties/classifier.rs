use std::collections::{HashMap, HashSet};

use governance_ledger::models::SnapshotEntry;
use governance_ledger::services::classifier::ParticipantClassifier;
use proptest::prelude::*;

use super::strategies::ADDRESS_POOL;

fn holdings_strategy() -> impl Strategy<Value = HashMap<String, SnapshotEntry>> {
	prop::collection::vec((0usize..ADDRESS_POOL.len(), -50.0f64..1000.0, any::<bool>()), 1..12)
		.prop_map(|entries| {
			let mut holdings = HashMap::new();
			for (index, holding, contract) in entries {
				// Last write wins for duplicate addresses
				holdings.insert(
					ADDRESS_POOL[index].to_string(),
					SnapshotEntry { holding, contract },
				);
			}
			holdings
		})
}

proptest! {
	/// Whales and non-whales partition the filtered holder set.
	#[test]
	fn classes_partition_holders(holdings in holdings_strategy()) {
		let classifier = ParticipantClassifier::new();
		let classification = classifier.classify(&holdings, None, "s.eth", &HashSet::new());

		let union: HashSet<_> = classification
			.whales
			.union(&classification.non_whales)
			.cloned()
			.collect();
		let holders: HashSet<_> = classification.holders.iter().cloned().collect();
		prop_assert_eq!(union, holders);
		prop_assert!(classification.whales.is_disjoint(&classification.non_whales));
	}

	/// Membership respects the threshold rule exactly.
	#[test]
	fn membership_respects_threshold(holdings in holdings_strategy()) {
		let classifier = ParticipantClassifier::new();
		let classification = classifier.classify(&holdings, None, "s.eth", &HashSet::new());
		let cutoff = 0.05 * classification.total_holding;

		for whale in &classification.whales {
			prop_assert!(holdings[whale].holding >= cutoff);
		}
		for non_whale in &classification.non_whales {
			prop_assert!(holdings[non_whale].holding < cutoff);
		}
	}

	/// Contracts and non-positive balances never enter the holder pool.
	#[test]
	fn filtered_wallets_stay_out(holdings in holdings_strategy()) {
		let classifier = ParticipantClassifier::new();
		let classification = classifier.classify(&holdings, None, "s.eth", &HashSet::new());

		for (address, entry) in &holdings {
			if entry.contract || entry.holding <= 0.0 {
				prop_assert!(!classification.holders.contains(address));
			}
		}
	}
}
