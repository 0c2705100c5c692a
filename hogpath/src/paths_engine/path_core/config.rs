use serde::{Deserialize, Serialize};

use super::event::{trim_trailing_slash, PathEventKind};
use crate::paths_engine::types::PathsError;

pub const DEFAULT_SESSION_WINDOW_MINUTES: u64 = 30;
pub const DEFAULT_MAX_STEPS: usize = 20;
pub const MIN_MAX_STEPS: usize = 2;
pub const MAX_MAX_STEPS: usize = 20;

/// How the downstream percentage calculator interprets edge weights. Carried
/// through the request but never consumed by the graph construction itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepReference {
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "previous")]
    Previous,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub session_window_minutes: u64,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    pub max_steps: usize,
    pub step_reference: StepReference,
    pub include_event_types: Vec<PathEventKind>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            session_window_minutes: DEFAULT_SESSION_WINDOW_MINUTES,
            start_point: None,
            end_point: None,
            max_steps: DEFAULT_MAX_STEPS,
            step_reference: StepReference::Total,
            include_event_types: vec![
                PathEventKind::Pageview,
                PathEventKind::Screen,
                PathEventKind::CustomEvent,
                PathEventKind::Hogql,
            ],
        }
    }
}

impl PathsConfig {
    /// Checks every request option before any event is processed. Start and
    /// end points get the same trailing-slash trim the URL normalizer
    /// applies, so they compare against normalized labels by plain equality.
    pub fn validated(mut self) -> Result<Self, PathsError> {
        if self.max_steps < MIN_MAX_STEPS || self.max_steps > MAX_MAX_STEPS {
            return Err(PathsError::MalformedConfiguration(format!(
                "max_steps must be between {} and {}, got {}",
                MIN_MAX_STEPS, MAX_MAX_STEPS, self.max_steps
            )));
        }
        if self.session_window_minutes == 0 {
            return Err(PathsError::MalformedConfiguration(
                "session_window_minutes must be positive".to_string(),
            ));
        }
        self.start_point = self
            .start_point
            .map(|p| trim_trailing_slash(&p).to_string());
        self.end_point = self.end_point.map(|p| trim_trailing_slash(&p).to_string());
        Ok(self)
    }

    pub fn session_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_window_minutes as i64)
    }
}
