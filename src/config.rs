//! Layered configuration store.
//!
//! [`PropertySource`] is a named flat map of dot-delimited keys to values.
//! [`ConfigSources`] keeps sources in precedence order: the earliest
//! registered source wins on reads, and the resolver publishes its overlay
//! at the front so resolved values shadow every pre-existing layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::OVERLAY_SOURCE_NAME;

/// A named flat map of configuration keys to values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    name: String,
    entries: BTreeMap<String, Value>,
}

impl PropertySource {
    /// Creates an empty source with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Creates a source directly from an existing map.
    pub fn from_map(name: impl Into<String>, entries: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Builder-style insert, handy when wiring sources up at startup.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

/// An ordered collection of property sources.
///
/// Index 0 has the highest read priority. [`ConfigSources::add`] registers
/// a source behind everything already present, so registration order and
/// precedence coincide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSources {
    sources: Vec<PropertySource>,
}

impl ConfigSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source with lower precedence than everything already
    /// present.
    pub fn add(&mut self, source: PropertySource) {
        self.sources.push(source);
    }

    /// Installs a source in front of everything already present, replacing
    /// any existing source with the same name.
    pub fn add_first(&mut self, source: PropertySource) {
        self.sources.retain(|s| s.name() != source.name());
        self.sources.insert(0, source);
    }

    /// Returns the value for `key` from the highest-priority source that
    /// defines it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.sources.iter().find_map(|s| s.get(key))
    }

    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }

    /// Collapses all sources into one flat view. On duplicate keys the
    /// earliest registered source wins, matching [`ConfigSources::get`].
    pub fn merged(&self) -> BTreeMap<&str, &Value> {
        let mut merged = BTreeMap::new();
        for source in &self.sources {
            for (key, value) in source.iter() {
                merged.entry(key.as_str()).or_insert(value);
            }
        }
        merged
    }

    /// Publishes a resolved overlay as the highest-priority source.
    ///
    /// Publishing again replaces the previous overlay rather than merging
    /// with it.
    pub fn publish(&mut self, overlay: BTreeMap<String, Value>) {
        self.add_first(PropertySource::from_map(OVERLAY_SOURCE_NAME, overlay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_prefers_earliest_source() {
        let mut sources = ConfigSources::new();
        sources.add(PropertySource::new("first").with("shared", "a"));
        sources.add(PropertySource::new("second").with("shared", "b").with("only", "c"));

        assert_eq!(sources.get("shared"), Some(&Value::from("a")));
        assert_eq!(sources.get("only"), Some(&Value::from("c")));
        assert_eq!(sources.get("absent"), None);
    }

    #[test]
    fn test_merged_earliest_wins() {
        let mut sources = ConfigSources::new();
        sources.add(PropertySource::new("first").with("shared", "a"));
        sources.add(PropertySource::new("second").with("shared", "b"));

        let merged = sources.merged();
        assert_eq!(merged.get("shared"), Some(&&Value::from("a")));
    }

    #[test]
    fn test_publish_takes_highest_priority() {
        let mut sources = ConfigSources::new();
        sources.add(PropertySource::new("application").with("db.password", "placeholder"));

        let mut overlay = BTreeMap::new();
        overlay.insert("db.password".to_string(), Value::from("resolved"));
        sources.publish(overlay);

        assert_eq!(sources.get("db.password"), Some(&Value::from("resolved")));
        assert_eq!(sources.sources()[0].name(), OVERLAY_SOURCE_NAME);
    }

    #[test]
    fn test_republish_replaces_previous_overlay() {
        let mut sources = ConfigSources::new();
        sources.add(PropertySource::new("application"));

        let mut first = BTreeMap::new();
        first.insert("stale".to_string(), Value::from("x"));
        sources.publish(first);

        let mut second = BTreeMap::new();
        second.insert("fresh".to_string(), Value::from("y"));
        sources.publish(second);

        assert_eq!(sources.sources().len(), 2);
        assert_eq!(sources.get("stale"), None);
        assert_eq!(sources.get("fresh"), Some(&Value::from("y")));
    }
}
