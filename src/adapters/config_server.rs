// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote config server source adapter.
//!
//! Fetches an application's environment once from a Spring Cloud Config
//! compatible server (`GET {uri}/{application}/{profiles}[/{label}]`) and
//! serves lookups from the flattened result. The response lists property
//! sources from most to least specific; when several define the same key the
//! first one wins.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default config server location.
pub const DEFAULT_URI: &str = "http://localhost:8888";

const SOURCE_NAME: &str = "configserver";

/// Where and what to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigServerOptions {
    /// Base URI of the server
    pub uri: String,
    /// Application name (`spring.application.name`)
    pub application: String,
    /// Active profiles, joined with `,` in the request path
    pub profiles: Vec<String>,
    /// Optional label (usually a git branch)
    pub label: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl ConfigServerOptions {
    /// Options for `application` on the server at `uri`, with the `default`
    /// profile and no label.
    pub fn new(uri: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            application: application.into(),
            profiles: vec!["default".to_string()],
            label: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the active profiles. An empty list falls back to `default`.
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let profiles: Vec<String> = profiles
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.trim().is_empty())
            .collect();
        self.profiles = if profiles.is_empty() {
            vec!["default".to_string()]
        } else {
            profiles
        };
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The request URL. A `/` inside the label is sent as `(_)`, the way
    /// config servers expect it.
    pub fn url(&self) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.uri.trim_end_matches('/'),
            self.application,
            self.profiles.join(",")
        );
        if let Some(label) = &self.label {
            url.push('/');
            url.push_str(&label.replace('/', "(_)"));
        }
        url
    }
}

/// The environment document returned by the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Environment {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    profiles: Vec<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    property_sources: Vec<PropertySource>,
}

#[derive(Debug, Deserialize)]
struct PropertySource {
    name: String,
    #[serde(default)]
    source: serde_json::Map<String, Value>,
}

/// Configuration source backed by a remote config server.
///
/// # Priority
///
/// Remote configuration has a priority of 1, alongside configuration files.
///
/// # Examples
///
/// ```rust,no_run
/// use bootcfg::adapters::{ConfigServerAdapter, ConfigServerOptions};
///
/// let options = ConfigServerOptions::new("http://localhost:8888", "config-client")
///     .with_profiles(["dev"]);
/// let adapter = ConfigServerAdapter::fetch_blocking(&options).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigServerAdapter {
    property_sources: Vec<String>,
    values: HashMap<String, String>,
}

impl ConfigServerAdapter {
    /// Fetches the environment described by `options`.
    ///
    /// # Errors
    ///
    /// Connection failures, timeouts and non-success statuses are reported
    /// as [`ConfigError::SourceError`]; a body that is not an environment
    /// document as [`ConfigError::ParseError`]. Nothing is retried.
    pub async fn fetch(options: &ConfigServerOptions) -> Result<Self> {
        let url = options.url();
        tracing::debug!("Fetching remote configuration from {}", url);

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Could not reach config server at {}", url),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Config server returned {} for {}", status, url),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to read config server response from {}", url),
            source: Some(Box::new(e)),
        })?;

        Self::from_environment_json(&body)
    }

    /// Synchronous variant of [`fetch`](Self::fetch) for start-up code.
    ///
    /// Runs the request on a private current-thread runtime. Calling it from
    /// inside an async runtime is an error; use `fetch` there.
    pub fn fetch_blocking(options: &ConfigServerOptions) -> Result<Self> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "fetch_blocking called from within an async runtime".to_string(),
                source: None,
            });
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(Self::fetch(options))
    }

    /// Builds the adapter from an environment document.
    ///
    /// ```rust
    /// use bootcfg::adapters::ConfigServerAdapter;
    /// use bootcfg::ports::ConfigSource;
    ///
    /// let json = r#"{
    ///   "name": "config-client",
    ///   "profiles": ["default"],
    ///   "propertySources": [
    ///     {"name": "config-client.properties", "source": {"message-from-config-server": "hi"}},
    ///     {"name": "application.properties", "source": {"message-from-config-server": "shadowed"}}
    ///   ]
    /// }"#;
    /// let adapter = ConfigServerAdapter::from_environment_json(json).unwrap();
    /// assert_eq!(adapter.get_str("message-from-config-server").unwrap().unwrap().as_str(), "hi");
    /// ```
    pub fn from_environment_json(json: &str) -> Result<Self> {
        let environment: Environment =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
                message: format!("Invalid config server response: {}", e),
                source: Some(Box::new(e)),
            })?;

        tracing::info!(
            "Located environment: name={}, profiles={:?}, label={}",
            environment.name.as_deref().unwrap_or("<none>"),
            environment.profiles,
            environment.label.as_deref().unwrap_or("<none>")
        );

        let mut values = HashMap::new();
        let mut property_sources = Vec::with_capacity(environment.property_sources.len());
        for property_source in environment.property_sources {
            tracing::debug!(
                "Property source '{}' with {} entries",
                property_source.name,
                property_source.source.len()
            );
            let mut flat = HashMap::new();
            for (key, value) in &property_source.source {
                flatten(value, key, &mut flat);
            }
            for (key, value) in flat {
                values.entry(key).or_insert(value);
            }
            property_sources.push(property_source.name);
        }

        Ok(Self {
            property_sources,
            values,
        })
    }

    /// Names of the remote property sources, most specific first.
    pub fn property_sources(&self) -> &[String] {
        &self.property_sources
    }
}

/// Stringifies scalars; nested objects and arrays are flattened with dots
/// and indices.
fn flatten(value: &Value, key: &str, out: &mut HashMap<String, String>) {
    match value {
        Value::String(s) => {
            out.insert(key.to_string(), s.clone());
        }
        Value::Number(n) => {
            out.insert(key.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            out.insert(key.to_string(), b.to_string());
        }
        Value::Null => {
            out.insert(key.to_string(), String::new());
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(item, &format!("{}.{}", key, i), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                flatten(v, &format!("{}.{}", key, k), out);
            }
        }
    }
}

impl ConfigSource for ConfigServerAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn priority(&self) -> u8 {
        1
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
