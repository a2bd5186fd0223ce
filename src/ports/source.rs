// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! `ConfigSource` is the port every provider of key/value pairs implements:
//! files, environment variables, command-line arguments, a remote config
//! server, or a hand-written source answering a few keys.

use crate::domain::{ConfigKey, ConfigValue, Result};

/// A named provider of configuration values.
///
/// Sources are built once at start-up and never change afterwards. The
/// resolver owns them and queries them in order; the first one that returns a
/// value wins.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a built resolver can be shared.
///
/// # Priority
///
/// [`priority`](ConfigSource::priority) only decides where the resolver
/// builder places a source when no explicit position is given. Higher values
/// are searched first:
///
/// - **3**: Command-line arguments
/// - **2**: Environment variables
/// - **1**: Configuration files and remote config servers
/// - **0**: Custom sources (the default)
///
/// # Examples
///
/// ```rust
/// use bootcfg::ports::ConfigSource;
/// use bootcfg::domain::{ConfigKey, ConfigValue, Result};
///
/// struct Greeting;
///
/// impl ConfigSource for Greeting {
///     fn name(&self) -> &str {
///         "greeting"
///     }
///
///     fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok(key
///             .as_str()
///             .eq_ignore_ascii_case("greeting")
///             .then(|| ConfigValue::from("hello")))
///     }
///
///     fn all_keys(&self) -> Result<Vec<ConfigKey>> {
///         Ok(vec![ConfigKey::from("greeting")])
///     }
/// }
///
/// let source = Greeting;
/// assert_eq!(source.priority(), 0);
/// assert!(source.get_str("GREETING").unwrap().is_some());
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// Names identify sources inside a resolver and must be unique there.
    fn name(&self) -> &str;

    /// Returns the default ordering hint for this source.
    fn priority(&self) -> u8 {
        0
    }

    /// Retrieves a configuration value for the given key.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConfigValue))` - The value was found
    /// * `Ok(None)` - The key does not exist in this source
    /// * `Err(ConfigError)` - An error occurred
    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// Returns all configuration keys available in this source.
    ///
    /// Typed binding uses this to discover the keys under a prefix. Sources
    /// that answer lookups computationally may return only the keys they
    /// know about.
    fn all_keys(&self) -> Result<Vec<ConfigKey>>;

    /// Retrieves a configuration value for the given key string.
    ///
    /// Equivalent to calling `get(&ConfigKey::from(key))`.
    fn get_str(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.get(&ConfigKey::from(key))
    }
}
