use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::models::{resolve_delegatee, DelegationState, Snapshot, SnapshotEntry, VoteRecord};
use crate::utils::constants::WHALE_THRESHOLD;

/// One applied delegation transfer.
///
/// `delegator_holding` is the delegator's holding at transfer time (the
/// amount moved); `delegatee_holding` is the delegatee's holding after
/// receiving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegationRecord {
    pub delegator: String,
    pub delegatee: String,
    pub delegator_holding: f64,
    pub delegatee_holding: f64,
    pub delegator_contract: bool,
}

/// Output of one classification run.
///
/// `total_holding` is computed from the pre-delegation filtered holdings
/// (positive, non-contract) and stays the threshold denominator even after
/// delegation transfers reshape per-wallet holdings. This asymmetry is
/// carried over from the established outputs this pipeline reproduces; see
/// the classifier tests that pin it.
#[derive(Debug, Clone)]
pub struct Classification {
    pub whale_threshold: f64,
    pub total_holding: f64,
    pub holders: BTreeSet<String>,
    pub whales: BTreeSet<String>,
    pub non_whales: BTreeSet<String>,
    pub adjusted_holdings: HashMap<String, SnapshotEntry>,
    pub delegatees: BTreeSet<String>,
    pub delegation_records: Vec<DelegationRecord>,
}

impl Classification {
    /// Whale test against the post-delegation holding of `address`.
    pub fn is_whale(&self, address: &str) -> bool {
        self.adjusted_holdings
            .get(address)
            .map(|entry| entry.holding >= self.whale_threshold * self.total_holding)
            .unwrap_or(false)
    }
}

/// Voter participation per holder class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationSummary {
    pub holder_num: usize,
    pub whale_num: usize,
    pub non_whale_num: usize,
    pub whale_vote_num: usize,
    pub non_whale_vote_num: usize,
    pub unknown_voter_num: usize,
    pub whale_turnout: Option<f64>,
    pub non_whale_turnout: Option<f64>,
    pub whale_hhi: Option<f64>,
    pub non_whale_hhi: Option<f64>,
}

pub struct ParticipantClassifier {
    whale_threshold: f64,
}

impl ParticipantClassifier {
    pub fn new() -> Self {
        ParticipantClassifier {
            whale_threshold: WHALE_THRESHOLD,
        }
    }

    pub fn with_threshold(whale_threshold: f64) -> Self {
        ParticipantClassifier { whale_threshold }
    }

    /// Merge several tokens' snapshots by summing per-wallet holdings. The
    /// contract flag comes from the wallet's first occurrence.
    pub fn merge_snapshots(&self, snapshots: &[Snapshot]) -> HashMap<String, SnapshotEntry> {
        let mut merged: HashMap<String, SnapshotEntry> = HashMap::new();
        for snapshot in snapshots {
            for (address, entry) in &snapshot.entries {
                let slot = merged.entry(address.clone()).or_insert(SnapshotEntry {
                    holding: 0.0,
                    contract: entry.contract,
                });
                slot.holding += entry.holding;
            }
        }
        merged
    }

    /// Classify the holder base of a merged snapshot.
    ///
    /// Base whale / non-whale membership partitions the filtered holders
    /// (positive, non-contract). When a delegation state is supplied, each
    /// snapshot wallet with an effective delegatee for `space` that did not
    /// vote itself has its holding transferred to the delegatee and is
    /// removed from the adjusted pool; delegators are processed in
    /// lexicographic address order so chained delegations resolve
    /// deterministically.
    pub fn classify(
        &self,
        holdings: &HashMap<String, SnapshotEntry>,
        delegations: Option<&DelegationState>,
        space: &str,
        voters: &HashSet<String>,
    ) -> Classification {
        let filtered: BTreeMap<&String, f64> = holdings
            .iter()
            .filter(|(_, entry)| entry.holding > 0.0 && !entry.contract)
            .map(|(address, entry)| (address, entry.holding))
            .collect();
        let total_holding: f64 = filtered.values().sum();

        let mut whales = BTreeSet::new();
        let mut non_whales = BTreeSet::new();
        for (address, &holding) in &filtered {
            if holding >= self.whale_threshold * total_holding {
                whales.insert((*address).clone());
            } else {
                non_whales.insert((*address).clone());
            }
        }
        let holders: BTreeSet<String> = filtered.keys().map(|a| (*a).clone()).collect();

        let mut adjusted_holdings = holdings.clone();
        let mut delegatees = BTreeSet::new();
        let mut delegation_records = Vec::new();

        if let Some(state) = delegations {
            // Delegation applies to every snapshot wallet, filtered or not
            let snapshot_wallets: BTreeSet<&String> = holdings.keys().collect();
            for delegator in snapshot_wallets {
                let Some(delegatee) = resolve_delegatee(state, delegator, space) else {
                    continue;
                };
                if voters.contains(delegator) {
                    continue;
                }
                let Some(delegator_entry) = adjusted_holdings.get(delegator).copied() else {
                    // Already transferred away in a delegation chain
                    continue;
                };

                delegatees.insert(delegatee.clone());
                let slot = adjusted_holdings
                    .entry(delegatee.clone())
                    .or_insert(SnapshotEntry {
                        holding: 0.0,
                        contract: false,
                    });
                slot.holding += delegator_entry.holding;
                delegation_records.push(DelegationRecord {
                    delegator: delegator.clone(),
                    delegatee: delegatee.clone(),
                    delegator_holding: delegator_entry.holding,
                    delegatee_holding: slot.holding,
                    delegator_contract: delegator_entry.contract,
                });
                adjusted_holdings.remove(delegator);
            }
        }

        debug!(
            holders = holders.len(),
            whales = whales.len(),
            delegations = delegation_records.len(),
            "classification complete"
        );

        Classification {
            whale_threshold: self.whale_threshold,
            total_holding,
            holders,
            whales,
            non_whales,
            adjusted_holdings,
            delegatees,
            delegation_records,
        }
    }

    /// Summarize voter participation against a classification.
    pub fn summarize(
        &self,
        classification: &Classification,
        votes: &[VoteRecord],
    ) -> ParticipationSummary {
        let mut whale_choices = Vec::new();
        let mut non_whale_choices = Vec::new();
        let mut unknown_voter_num = 0usize;

        for vote in votes {
            if classification.adjusted_holdings.contains_key(&vote.voter) {
                if classification.is_whale(&vote.voter) {
                    whale_choices.push(vote.choice.clone());
                } else {
                    non_whale_choices.push(vote.choice.clone());
                }
            } else {
                unknown_voter_num += 1;
            }
        }

        let whale_num = classification.whales.len();
        let non_whale_num = classification.non_whales.len();
        let turnout = |votes: usize, population: usize| {
            if population > 0 {
                Some(votes as f64 / population as f64)
            } else {
                None
            }
        };

        ParticipationSummary {
            holder_num: classification.holders.len(),
            whale_num,
            non_whale_num,
            whale_vote_num: whale_choices.len(),
            non_whale_vote_num: non_whale_choices.len(),
            unknown_voter_num,
            whale_turnout: turnout(whale_choices.len(), whale_num),
            non_whale_turnout: turnout(non_whale_choices.len(), non_whale_num),
            whale_hhi: standardized_hhi(&choice_frequency(&whale_choices)),
            non_whale_hhi: standardized_hhi(&choice_frequency(&non_whale_choices)),
        }
    }
}

impl Default for ParticipantClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn choice_frequency(choices: &[String]) -> Vec<usize> {
    let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for choice in choices {
        *frequency.entry(choice).or_insert(0) += 1;
    }
    frequency.into_values().collect()
}

/// Standardized Herfindahl–Hirschman index of choice concentration.
///
/// 1.0 means every vote went to one choice, 0.0 means votes spread evenly
/// across the observed choices. `None` when there is nothing to measure.
pub fn standardized_hhi(counts: &[usize]) -> Option<f64> {
    if counts.is_empty() {
        return None;
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return None;
    }
    let hhi: f64 = counts
        .iter()
        .map(|&count| {
            let share = count as f64 / total as f64;
            share * share
        })
        .sum();
    let n = counts.len();
    if n == 1 {
        return Some(1.0);
    }
    let floor = 1.0 / n as f64;
    Some((hhi - floor) / (1.0 - floor))
}
