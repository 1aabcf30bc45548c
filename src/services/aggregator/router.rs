use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::models::{FlowEdge, TransactionFlow, TransferEvent};
use crate::services::aggregator::AggregatorError;

/// Conservation tolerance in human-readable token units. Generous headroom
/// for rounding artifacts of decimal division, not a block count.
pub const FLOW_TOLERANCE: f64 = 1.0;

/// Collapses the edges of one transaction into net source → sink flows.
///
/// Node iteration is always in lexicographic address order so that
/// floating-point summation order, and therefore the emitted edge list, is
/// reproducible across runs.
pub struct RouterFlowAggregator {
    tolerance: f64,
}

impl RouterFlowAggregator {
    pub fn new() -> Self {
        RouterFlowAggregator {
            tolerance: FLOW_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        RouterFlowAggregator { tolerance }
    }

    /// Group a chronologically sorted event sequence by transaction hash and
    /// aggregate each multi-edge transaction. Events of one transaction are
    /// contiguous in the input because the sort key starts with
    /// `(block_number, transaction_index)`.
    pub fn aggregate_stream(
        &self,
        events: &[TransferEvent],
    ) -> Result<Vec<TransactionFlow>, AggregatorError> {
        let mut flows = Vec::new();
        for (hash, group) in &events.iter().group_by(|e| e.transaction_hash.clone()) {
            let group: Vec<&TransferEvent> = group.collect();
            let block_number = group[0].block_number;

            // Most transactions carry a single edge; skip aggregation there
            let edges = if group.len() == 1 {
                vec![group[0].edge()]
            } else {
                let raw: Vec<FlowEdge> = group.iter().map(|e| e.edge()).collect();
                self.aggregate_transaction(&raw).map_err(|e| match e {
                    AggregatorError::ConservationViolation(msg) => {
                        AggregatorError::ConservationViolation(format!("{}: {}", hash, msg))
                    }
                    other => other,
                })?
            };

            flows.push(TransactionFlow {
                block_number,
                transaction_hash: hash,
                edges,
            });
        }
        Ok(flows)
    }

    /// Aggregate the raw edges of a single transaction into net flows.
    ///
    /// A node's net is its total outgoing minus total incoming amount;
    /// positive nets are sources, negative nets are sinks, zero nets
    /// (pass-through intermediaries) disappear. With several sources and
    /// several sinks the true assignment is not recoverable from net flow
    /// alone, so each source is split across sinks proportionally to sink
    /// demand; this exact policy must be kept for reproducibility.
    pub fn aggregate_transaction(
        &self,
        edges: &[FlowEdge],
    ) -> Result<Vec<FlowEdge>, AggregatorError> {
        if edges.len() == 1 {
            return Ok(vec![edges[0].clone()]);
        }

        // Capacity matrix: summed amounts per (from, to) pair
        let mut capacity: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
        for edge in edges {
            *capacity
                .entry(edge.from.as_str())
                .or_default()
                .entry(edge.to.as_str())
                .or_insert(0.0) += edge.amount;
        }

        let mut out_amount: BTreeMap<&str, f64> = BTreeMap::new();
        let mut in_amount: BTreeMap<&str, f64> = BTreeMap::new();
        for (from, row) in &capacity {
            for (to, amount) in row {
                *out_amount.entry(*from).or_insert(0.0) += *amount;
                *in_amount.entry(*to).or_insert(0.0) += *amount;
            }
        }

        let nodes: BTreeSet<&str> = out_amount
            .keys()
            .chain(in_amount.keys())
            .copied()
            .collect();

        let mut sources: Vec<(&str, f64)> = Vec::new();
        let mut sinks: Vec<(&str, f64)> = Vec::new();
        for node in nodes {
            let net = out_amount.get(node).copied().unwrap_or(0.0)
                - in_amount.get(node).copied().unwrap_or(0.0);
            if net > 0.0 {
                sources.push((node, net));
            } else if net < 0.0 {
                sinks.push((node, -net));
            }
        }

        let flow = match (sources.len(), sinks.len()) {
            (1, 1) => vec![make_edge(sources[0].0, sinks[0].0, sources[0].1)],
            (1, n) if n > 1 => {
                let source = sources[0].0;
                sinks
                    .iter()
                    .map(|(sink, demand)| make_edge(source, sink, *demand))
                    .collect()
            }
            (n, 1) if n > 1 => {
                let sink = sinks[0].0;
                sources
                    .iter()
                    .map(|(source, supply)| make_edge(source, sink, *supply))
                    .collect()
            }
            _ => {
                let total_source: f64 = sources.iter().map(|(_, a)| a).sum();
                let total_sink: f64 = sinks.iter().map(|(_, a)| a).sum();
                if (total_source - total_sink).abs() > self.tolerance {
                    return Err(AggregatorError::conservation_violation(format!(
                        "source total {} and sink total {} do not match",
                        total_source, total_sink
                    )));
                }

                let mut flow = Vec::with_capacity(sources.len() * sinks.len());
                for (source, supply) in &sources {
                    for (sink, demand) in &sinks {
                        flow.push(make_edge(source, sink, supply * (demand / total_sink)));
                    }
                }
                flow
            }
        };

        Ok(flow)
    }
}

impl Default for RouterFlowAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn make_edge(from: &str, to: &str, amount: f64) -> FlowEdge {
    FlowEdge {
        from: from.to_string(),
        to: to.to_string(),
        amount,
    }
}
