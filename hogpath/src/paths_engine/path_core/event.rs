use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub const PAGEVIEW_EVENT: &str = "$pageview";
pub const SCREEN_EVENT: &str = "$screen";
pub const CURRENT_URL_PROPERTY: &str = "$current_url";
pub const SCREEN_NAME_PROPERTY: &str = "$screen_name";
/// Upstream evaluates the configured HogQL expression per event and writes
/// the resolved string here; this layer only reads it back.
pub const VIRTUAL_PATH_PROPERTY: &str = "$virtual_path";

/// The event sources a path can be stitched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathEventKind {
    #[serde(rename = "$pageview")]
    Pageview,
    #[serde(rename = "$screen")]
    Screen,
    #[serde(rename = "custom_event")]
    CustomEvent,
    #[serde(rename = "hogql")]
    Hogql,
}

/// One already-filtered event record as handed over by the upstream query
/// layer. Filtering (date range, person properties, test accounts) happened
/// before this point.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub event: String,
    pub person_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub properties: HashMap<String, JsonValue>,
}

/// A raw event with its grouping label resolved. `step_label` is the only
/// field the dedup and truncation logic ever compares.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEvent {
    pub person_id: String,
    pub timestamp: DateTime<Utc>,
    pub step_label: String,
    pub raw_event_name: String,
}

/// Trims a single trailing slash so `/pricing` and `/pricing/` group as one
/// step. The bare root `/` is left alone.
pub fn trim_trailing_slash(url: &str) -> &str {
    if url.len() > 1 {
        url.strip_suffix('/').unwrap_or(url)
    } else {
        url
    }
}

/// Maps heterogeneous raw events onto uniform [`PathEvent`]s. Events whose
/// kind is excluded, or whose resolving property is missing or not a string,
/// yield `None` and drop out of the path silently.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    include_pageviews: bool,
    include_screens: bool,
    include_custom_events: bool,
    include_hogql: bool,
}

impl EventNormalizer {
    pub fn new(include: &[PathEventKind]) -> Self {
        Self {
            include_pageviews: include.contains(&PathEventKind::Pageview),
            include_screens: include.contains(&PathEventKind::Screen),
            include_custom_events: include.contains(&PathEventKind::CustomEvent),
            include_hogql: include.contains(&PathEventKind::Hogql),
        }
    }

    pub fn normalize(&self, event: &RawEvent) -> Option<PathEvent> {
        let step_label = self.resolve_label(event)?;
        Some(PathEvent {
            person_id: event.person_id.clone(),
            timestamp: event.timestamp,
            step_label,
            raw_event_name: event.event.clone(),
        })
    }

    fn resolve_label(&self, event: &RawEvent) -> Option<String> {
        // A pre-evaluated virtual path wins over the event-name rules.
        if self.include_hogql {
            if let Some(label) = Self::string_property(event, VIRTUAL_PATH_PROPERTY) {
                return Some(label.to_string());
            }
        }
        match event.event.as_str() {
            PAGEVIEW_EVENT => {
                if !self.include_pageviews {
                    return None;
                }
                Self::string_property(event, CURRENT_URL_PROPERTY)
                    .map(|url| trim_trailing_slash(url).to_string())
            }
            SCREEN_EVENT => {
                if !self.include_screens {
                    return None;
                }
                Self::string_property(event, SCREEN_NAME_PROPERTY).map(str::to_string)
            }
            name => {
                if !self.include_custom_events {
                    return None;
                }
                Some(name.to_string())
            }
        }
    }

    fn string_property<'a>(event: &'a RawEvent, key: &str) -> Option<&'a str> {
        event.properties.get(key).and_then(JsonValue::as_str)
    }
}
