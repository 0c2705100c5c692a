use super::config::PathsConfig;
use super::event::PathEvent;

/// One person's journey through one session window. Exclusively owned by the
/// extraction stage until the aggregator consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonPathSequence {
    pub person_id: String,
    pub ordered_steps: Vec<PathEvent>,
}

/// Turns one person's chronologically sorted events into zero or more
/// qualifying path sequences: splits on session gaps, collapses reloads,
/// applies start/end-point truncation and the step cap.
pub struct SessionPathExtractor<'a> {
    config: &'a PathsConfig,
}

impl<'a> SessionPathExtractor<'a> {
    pub fn new(config: &'a PathsConfig) -> Self {
        Self { config }
    }

    /// Precondition: `events` all belong to one person and arrive sorted by
    /// timestamp ascending. Re-sorting here would mask upstream ordering
    /// bugs, so unsorted input is a programmer error.
    pub fn extract(&self, events: Vec<PathEvent>) -> Vec<PersonPathSequence> {
        debug_assert!(
            events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "events must be sorted by timestamp ascending"
        );

        self.split_sessions(events)
            .into_iter()
            .filter_map(|session| self.build_sequence(session))
            .collect()
    }

    /// A gap strictly greater than the session window closes the current
    /// session and opens a new one.
    fn split_sessions(&self, events: Vec<PathEvent>) -> Vec<Vec<PathEvent>> {
        let window = self.config.session_window();
        let mut sessions: Vec<Vec<PathEvent>> = Vec::new();

        for event in events {
            let starts_new_session = match sessions.last().and_then(|s| s.last()) {
                Some(previous) => event.timestamp - previous.timestamp > window,
                None => true,
            };
            if starts_new_session {
                sessions.push(vec![event]);
            } else if let Some(session) = sessions.last_mut() {
                session.push(event);
            }
        }
        sessions
    }

    fn build_sequence(&self, mut session: Vec<PathEvent>) -> Option<PersonPathSequence> {
        // Collapse reloads: consecutive identical labels become one step,
        // keeping the first occurrence's timestamp. Revisits after other
        // steps are kept.
        session.dedup_by(|current, previous| current.step_label == previous.step_label);

        if let Some(start) = &self.config.start_point {
            let first = session.iter().position(|e| &e.step_label == start)?;
            session.drain(..first);
        }
        if let Some(end) = &self.config.end_point {
            if let Some(last) = session.iter().position(|e| &e.step_label == end) {
                session.truncate(last + 1);
            } else {
                return None;
            }
        }

        session.truncate(self.config.max_steps);

        // A lone step has no transition to contribute.
        if session.len() < 2 {
            return None;
        }

        Some(PersonPathSequence {
            person_id: session[0].person_id.clone(),
            ordered_steps: session,
        })
    }
}
