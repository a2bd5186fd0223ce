// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;

/// Configuration source built from command-line arguments.
///
/// Recognised forms:
/// - `--key=value`
/// - `--key value`
/// - `-k value`
///
/// Anything else (positional arguments, a flag followed by another flag) is
/// ignored. When a key is repeated the last occurrence wins.
///
/// # Priority
///
/// Command-line arguments have the highest priority (3) and override every
/// other built-in source.
///
/// # Examples
///
/// ```rust
/// use bootcfg::adapters::CommandLineAdapter;
/// use bootcfg::ports::ConfigSource;
///
/// let adapter = CommandLineAdapter::from_args(vec!["--bootiful.message=hi", "--port", "8080"]);
/// assert_eq!(adapter.get_str("bootiful.message").unwrap().unwrap().as_str(), "hi");
/// assert_eq!(adapter.get_str("port").unwrap().unwrap().as_str(), "8080");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    values: HashMap<String, String>,
}

impl CommandLineAdapter {
    /// Creates an adapter with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter from a list of arguments (without the program name).
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let values = parse_args(&args);
        tracing::debug!("Parsed {} command-line properties", values.len());
        Self { values }
    }

    /// Creates an adapter from the process arguments, skipping the program
    /// name.
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Number of parsed properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no property was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_args<S: AsRef<str>>(args: &[S]) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        let next = args.get(i + 1).map(AsRef::as_ref);

        if let Some(body) = arg.strip_prefix("--") {
            match body.split_once('=') {
                Some((key, value)) => {
                    values.insert(key.to_string(), value.to_string());
                    i += 1;
                }
                None => match next {
                    Some(value) if !body.is_empty() && !value.starts_with('-') => {
                        values.insert(body.to_string(), value.to_string());
                        i += 2;
                    }
                    _ => i += 1,
                },
            }
        } else if let Some(short) = arg.strip_prefix('-').filter(|s| s.chars().count() == 1) {
            match next {
                Some(value) if !value.starts_with('-') => {
                    values.insert(short.to_string(), value.to_string());
                    i += 2;
                }
                _ => i += 1,
            }
        } else {
            i += 1;
        }
    }
    values
}

impl ConfigSource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
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
