// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;

/// A named, fixed map of configuration values.
///
/// Handy for hard-coded sources and for tests. Keys match exactly.
///
/// # Examples
///
/// ```rust
/// use bootcfg::adapters::MapSource;
/// use bootcfg::ports::ConfigSource;
///
/// let source = MapSource::new("defaults")
///     .with_value("server.port", "8080")
///     .with_priority(0);
/// assert_eq!(source.get_str("server.port").unwrap().unwrap().as_str(), "8080");
/// ```
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    priority: u8,
    values: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source with priority 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            values: HashMap::new(),
        }
    }

    /// Creates a source from an existing map.
    pub fn from_map<K, V, I>(name: impl Into<String>, values: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name: name.into(),
            priority: 0,
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds or replaces one value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Overrides the ordering hint.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(self
            .values
            .get(key.as_str())
            .map(|v| ConfigValue::from(v.as_str())))
    }

    fn all_keys(&self) -> Result<Vec<ConfigKey>> {
        Ok(self
            .values
            .keys()
            .map(|k| ConfigKey::from(k.as_str()))
            .collect())
    }
}
