// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! Lookups are relaxed: a key matches a variable when both agree after upper
//! casing and folding `.` and `-` into `_`. The key
//! `message-from-application-properties` therefore finds
//! `MESSAGE_FROM_APPLICATION_PROPERTIES`, and `bootiful.message` finds
//! `BOOTIFUL_MESSAGE`.

use crate::domain::config_key::relaxed_name;
use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for environment variables.
///
/// The environment is read once, when the adapter is built. An optional
/// prefix restricts the adapter to variables starting with it (compared in
/// relaxed form) and is stripped from their names.
///
/// # Priority
///
/// Environment variables have a priority of 2: they override configuration
/// files and remote sources (1) and are overridden by command-line
/// arguments (3).
///
/// # Examples
///
/// ```rust
/// use bootcfg::adapters::EnvVarAdapter;
/// use bootcfg::ports::ConfigSource;
///
/// let adapter = EnvVarAdapter::from_vars(
///     vec![("MYAPP_BOOTIFUL_MESSAGE".to_string(), "hi".to_string())],
///     Some("MYAPP_"),
/// );
/// assert_eq!(adapter.get_str("bootiful.message").unwrap().unwrap().as_str(), "hi");
/// assert_eq!(adapter.get_str("Bootiful-Message").unwrap().unwrap().as_str(), "hi");
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    prefix: Option<String>,
    /// Values keyed by relaxed variable name, prefix already stripped
    values: HashMap<String, String>,
}

impl EnvVarAdapter {
    /// Snapshots the whole process environment.
    pub fn new() -> Self {
        Self::from_vars(process_vars(), None)
    }

    /// Snapshots the process variables that start with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::from_vars(process_vars(), Some(&prefix))
    }

    /// Builds the adapter from explicit `(name, value)` pairs.
    ///
    /// Useful for tests and for feeding variables collected elsewhere.
    pub fn from_vars<I>(vars: I, prefix: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let relaxed_prefix = prefix.map(relaxed_name);
        let mut values = HashMap::new();

        for (name, value) in vars {
            if name.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    name.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let relaxed = relaxed_name(&name);
            let relaxed = match &relaxed_prefix {
                Some(p) => match relaxed.strip_prefix(p.as_str()) {
                    Some(stripped) if !stripped.is_empty() => stripped.to_string(),
                    _ => continue,
                },
                None => relaxed,
            };

            values.insert(relaxed, value);
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?})",
            values.len(),
            prefix
        );

        Self {
            prefix: prefix.map(str::to_string),
            values,
        }
    }

    /// The prefix this adapter filters on, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

/// Reads the process environment, skipping names or values that are not
/// valid UTF-8.
fn process_vars() -> Vec<(String, String)> {
    env::vars_os()
        .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            _ => {
                tracing::debug!("Skipping environment variable that is not valid UTF-8");
                None
            }
        })
        .collect()
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(self
            .values
            .get(&key.relaxed())
            .map(|v| ConfigValue::from(v.as_str())))
    }

    /// Keys are reported in lower-case dotted form (`BOOTIFUL_MESSAGE`
    /// becomes `bootiful.message`).
    fn all_keys(&self) -> Result<Vec<ConfigKey>> {
        Ok(self
            .values
            .keys()
            .map(|k| ConfigKey::from(k.to_lowercase().replace('_', ".")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(pairs: &[(&str, &str)], prefix: Option<&str>) -> EnvVarAdapter {
        EnvVarAdapter::from_vars(
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
            prefix,
        )
    }

    fn lookup(adapter: &EnvVarAdapter, key: &str) -> Option<String> {
        adapter
            .get(&ConfigKey::from(key))
            .unwrap()
            .map(ConfigValue::into_string)
    }

    #[test]
    fn test_env_adapter_name_and_priority() {
        let adapter = adapter(&[], None);
        assert_eq!(adapter.name(), "env");
        assert_eq!(adapter.priority(), 2);
        assert_eq!(adapter.prefix(), None);
    }

    #[test]
    fn test_env_adapter_relaxed_lookup() {
        let adapter = adapter(&[("MESSAGE_FROM_APPLICATION_PROPERTIES", "env says hi")], None);
        for key in [
            "message-from-application-properties",
            "message.from.application.properties",
            "MESSAGE_FROM_APPLICATION_PROPERTIES",
            "Message-From_Application.Properties",
        ] {
            assert_eq!(lookup(&adapter, key).as_deref(), Some("env says hi"), "{key}");
        }
    }

    #[test]
    fn test_env_adapter_lowercase_variable_names() {
        let adapter = adapter(&[("bootiful.message", "dotted")], None);
        assert_eq!(lookup(&adapter, "BOOTIFUL_MESSAGE").as_deref(), Some("dotted"));
    }

    #[test]
    fn test_env_adapter_get_nonexistent() {
        let adapter = adapter(&[("A", "1")], None);
        assert_eq!(lookup(&adapter, "nonexistent.var"), None);
    }

    #[test]
    fn test_env_adapter_with_prefix() {
        let adapter = adapter(
            &[("MYAPP_DATABASE_HOST", "localhost"), ("OTHER_VAR", "hidden"), ("MYAPP_", "x")],
            Some("myapp-"),
        );
        assert_eq!(lookup(&adapter, "database.host").as_deref(), Some("localhost"));
        assert_eq!(lookup(&adapter, "other.var"), None);
        assert_eq!(adapter.all_keys().unwrap(), vec![ConfigKey::from("database.host")]);
    }

    #[test]
    fn test_env_adapter_all_keys_dotted() {
        let adapter = adapter(&[("BOOTIFUL_MESSAGE", "hi")], None);
        assert_eq!(adapter.all_keys().unwrap(), vec![ConfigKey::from("bootiful.message")]);
    }

    #[test]
    fn test_env_adapter_skips_oversized() {
        let long_value = "x".repeat(MAX_ENV_VALUE_LEN + 1);
        let adapter = adapter(&[("BIG", long_value.as_str()), ("SMALL", "ok")], None);
        assert_eq!(lookup(&adapter, "big"), None);
        assert_eq!(lookup(&adapter, "small").as_deref(), Some("ok"));
    }

    #[test]
    fn test_env_adapter_reads_process_environment() {
        std::env::set_var("BOOTCFG_ENV_ADAPTER_TEST_KEY", "from process");
        let adapter = EnvVarAdapter::with_prefix("BOOTCFG_ENV_ADAPTER_");
        std::env::remove_var("BOOTCFG_ENV_ADAPTER_TEST_KEY");

        assert_eq!(lookup(&adapter, "test-key").as_deref(), Some("from process"));
        assert_eq!(adapter.prefix(), Some("BOOTCFG_ENV_ADAPTER_"));
    }
}
