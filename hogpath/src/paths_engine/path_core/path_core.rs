use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use super::aggregator::{PathEdge, PathEdgeAggregator};
use super::config::PathsConfig;
use super::event::{EventNormalizer, PathEvent, RawEvent};
use super::extractor::{PersonPathSequence, SessionPathExtractor};
use crate::paths_engine::types::PathsError;

/// The whole pipeline for one request: normalize raw events, cut each
/// person's stream into session paths, and aggregate the weighted edge list.
/// Construction validates the configuration; `run` cannot fail after that.
#[derive(Debug)]
pub struct PathsEngine {
    config: PathsConfig,
    normalizer: EventNormalizer,
}

impl PathsEngine {
    pub fn new(config: PathsConfig) -> Result<PathsEngine, PathsError> {
        let config = config.validated()?;
        let normalizer = EventNormalizer::new(&config.include_event_types);
        Ok(PathsEngine { config, normalizer })
    }

    /// `events` must be sorted by timestamp ascending within each person;
    /// the upstream query layer guarantees this.
    pub fn run(&self, events: &[RawEvent]) -> Vec<PathEdge> {
        let mut by_person: HashMap<String, Vec<PathEvent>> = HashMap::new();
        for event in events {
            if let Some(path_event) = self.normalizer.normalize(event) {
                by_person
                    .entry(path_event.person_id.clone())
                    .or_default()
                    .push(path_event);
            }
        }
        debug!(
            events = events.len(),
            persons = by_person.len(),
            "extracting session paths"
        );

        // Extraction is per-person and shares nothing, so it fans out;
        // aggregation stays a single-threaded reduction to keep the exact
        // ordering guarantees of the output.
        let extractor = SessionPathExtractor::new(&self.config);
        let sequences: Vec<PersonPathSequence> = by_person
            .into_par_iter()
            .flat_map(|(_, person_events)| extractor.extract(person_events))
            .collect();
        debug!(sequences = sequences.len(), "aggregating path edges");

        let edges = PathEdgeAggregator::aggregate(sequences);
        debug!(edges = edges.len(), "paths run complete");
        edges
    }
}
