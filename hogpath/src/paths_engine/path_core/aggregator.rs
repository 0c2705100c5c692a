use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt::{self, Display};

use super::extractor::PersonPathSequence;

/// A step label tagged with its 1-based position in its sequence. The
/// rendered form (`1_/home`) doubles as the aggregation key and the display
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedStep {
    pub step_label: String,
    pub sequence_index: usize,
}

impl Display for IndexedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.sequence_index, self.step_label)
    }
}

/// One aggregated transition of the response payload: how many sessions
/// moved from the indexed source step to the indexed target step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEdge {
    pub source: String,
    pub target: String,
    pub value: u64,
}

pub struct PathEdgeAggregator;

impl PathEdgeAggregator {
    /// Collapses every adjacent step pair across all sequences into weighted
    /// edges, sorted by descending weight and tie-broken ascending on
    /// `(source index, source label, target label)`. The target index is
    /// always the source index plus one, so it never enters the key.
    pub fn aggregate(sequences: Vec<PersonPathSequence>) -> Vec<PathEdge> {
        let mut counts: HashMap<(usize, String, String), u64> = HashMap::new();

        for sequence in sequences {
            for ((index, source), (_, target)) in sequence
                .ordered_steps
                .iter()
                .map(|step| step.step_label.as_str())
                .enumerate()
                .tuple_windows()
            {
                *counts
                    .entry((index + 1, source.to_string(), target.to_string()))
                    .or_insert(0) += 1;
            }
        }

        let mut edges: Vec<((usize, String, String), u64)> = counts.into_iter().collect();
        edges.sort_by(|((ai, asrc, atgt), av), ((bi, bsrc, btgt), bv)| {
            (Reverse(av), ai, asrc, atgt).cmp(&(Reverse(bv), bi, bsrc, btgt))
        });

        edges
            .into_iter()
            .map(|((index, source, target), value)| {
                let source = IndexedStep {
                    step_label: source,
                    sequence_index: index,
                };
                let target = IndexedStep {
                    step_label: target,
                    sequence_index: index + 1,
                };
                PathEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                    value,
                }
            })
            .collect()
    }
}
