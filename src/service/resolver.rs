// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration resolver implementation.
//!
//! The resolver owns an ordered list of configuration sources and answers
//! lookups by scanning it front to back: the first source holding a key
//! wins.

use crate::domain::{
    ConfigError, ConfigKey, ConfigValue, ConfigurationService, PlaceholderExpander, Result,
    TypedConfigurationBundle,
};
use crate::ports::ConfigSource;

/// Where [`ConfigResolver::add_source`] inserts a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePosition {
    /// Before every other source (highest priority)
    First,
    /// After every other source (lowest priority)
    Last,
    /// Immediately before the named source
    Before(String),
    /// Immediately after the named source
    After(String),
}

/// Resolves configuration keys against an ordered list of sources.
///
/// # Examples
///
/// ```rust
/// use bootcfg::prelude::*;
/// use bootcfg::adapters::MapSource;
///
/// # fn main() -> Result<()> {
/// let mut resolver = ConfigResolver::new();
/// resolver.add_source(
///     Box::new(MapSource::new("defaults").with_value("greeting", "hello")),
///     SourcePosition::Last,
/// )?;
/// resolver.add_source(
///     Box::new(MapSource::new("overrides").with_value("greeting", "hi")),
///     SourcePosition::First,
/// )?;
///
/// assert_eq!(resolver.resolve(&ConfigKey::from("greeting"))?.unwrap().as_str(), "hi");
/// assert_eq!(resolver.expand("${missing:${greeting}} there")?, "hi there");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigResolver {
    /// Sources in search order (highest priority first)
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolver {
    /// Creates a resolver with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new resolver builder.
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// Creates a resolver with default sources.
    ///
    /// This includes environment variables and every configuration file from
    /// [`DEFAULT_FILE_NAMES`](crate::adapters::file::DEFAULT_FILE_NAMES)
    /// present in the OS-appropriate configuration directory. Missing files
    /// are skipped; files that exist but fail to load are errors.
    ///
    /// ```rust,no_run
    /// use bootcfg::service::ConfigResolver;
    ///
    /// # fn main() -> bootcfg::domain::Result<()> {
    /// let resolver = ConfigResolver::with_defaults("myapp", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::file::{self, DEFAULT_FILE_NAMES};
        use crate::adapters::FileAdapter;

        let mut builder = Self::builder();

        #[cfg(feature = "env")]
        {
            builder = builder.with_env_vars();
        }

        match file::default_config_dir(app_name, qualifier) {
            Ok(dir) => {
                for name in DEFAULT_FILE_NAMES {
                    let path = dir.join(name);
                    if path.is_file() && file::is_supported(&path) {
                        builder = builder.with_source(Box::new(FileAdapter::from_file(path)?));
                    }
                }
            }
            Err(e) => tracing::debug!("No default configuration directory: {}", e),
        }

        builder.build()
    }

    /// Registers a source at `position`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateSource`] when a source with the same name is
    /// already registered, [`ConfigError::SourceNotFound`] when a relative
    /// position names an unknown source.
    pub fn add_source(
        &mut self,
        source: Box<dyn ConfigSource>,
        position: SourcePosition,
    ) -> Result<()> {
        if self.index_of(source.name()).is_some() {
            return Err(ConfigError::DuplicateSource {
                name: source.name().to_string(),
            });
        }

        let index = match &position {
            SourcePosition::First => 0,
            SourcePosition::Last => self.sources.len(),
            SourcePosition::Before(name) => self.require_index(name)?,
            SourcePosition::After(name) => self.require_index(name)? + 1,
        };

        tracing::debug!(
            "Registering configuration source '{}' at {:?} (index {})",
            source.name(),
            position,
            index
        );
        self.sources.insert(index, source);
        Ok(())
    }

    /// Names of the registered sources in search order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Looks up a registered source by name.
    pub fn source(&self, name: &str) -> Option<&dyn ConfigSource> {
        self.index_of(name).map(|i| self.sources[i].as_ref())
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` when no source is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name() == name)
    }

    fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| ConfigError::SourceNotFound {
            name: name.to_string(),
        })
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl ConfigurationService for ConfigResolver {
    fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        for source in &self.sources {
            if let Some(value) = source.get(key)? {
                tracing::trace!("Resolved '{}' from source '{}'", key, source.name());
                return Ok(Some(value));
            }
        }
        tracing::trace!("'{}' not found in any source", key);
        Ok(None)
    }

    fn bind_typed(&self, prefix: &str) -> Result<TypedConfigurationBundle> {
        let expander = PlaceholderExpander::new(|key: &ConfigKey| self.resolve(key));
        let mut bundle = TypedConfigurationBundle::new(prefix);

        for source in &self.sources {
            for key in source.all_keys()? {
                let Some(relative) = key.strip_prefix(prefix) else {
                    continue;
                };
                if bundle.contains(&relative) {
                    continue;
                }
                // Ask the whole chain so a higher source spelling the key
                // differently (e.g. `BOOTIFUL_MAX_SIZE`) still wins
                if let Some(value) = self.resolve(&key)? {
                    let expanded = expander.expand(value.as_str())?;
                    bundle.insert(&relative, ConfigValue::from(expanded));
                }
            }
        }

        tracing::debug!(
            "Bound {} fields under prefix '{}'",
            bundle.len(),
            bundle.prefix()
        );
        Ok(bundle)
    }
}

/// Builder for constructing a `ConfigResolver`.
///
/// Sources are ordered by [`ConfigSource::priority`] when the resolver is
/// built; sources of equal priority keep the order they were added in.
///
/// # Examples
///
/// ```rust
/// use bootcfg::service::ConfigResolverBuilder;
///
/// # fn main() -> bootcfg::domain::Result<()> {
/// let resolver = ConfigResolverBuilder::new()
///     .with_values("defaults", [("greeting", "hello")])
///     .with_cli_args(vec!["--greeting=hi"])
///     .build()?;
/// assert_eq!(resolver.source_names(), vec!["cli", "defaults"]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigResolverBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolverBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration source to the builder.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds a fixed map of values as a source with priority 0.
    pub fn with_values<K, V, I>(self, name: impl Into<String>, values: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        use crate::adapters::MapSource;
        self.with_source(Box::new(MapSource::from_map(name, values)))
    }

    /// Adds environment variables as a configuration source.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::new()))
    }

    /// Adds environment variables with a prefix as a configuration source.
    ///
    /// ```rust
    /// use bootcfg::service::ConfigResolverBuilder;
    ///
    /// # fn main() -> bootcfg::domain::Result<()> {
    /// let resolver = ConfigResolverBuilder::new()
    ///     .with_env_prefix("MYAPP_")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::with_prefix(prefix)))
    }

    /// Adds command-line arguments as a configuration source.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<S: AsRef<str>>(self, args: Vec<S>) -> Self {
        use crate::adapters::CommandLineAdapter;
        self.with_source(Box::new(CommandLineAdapter::from_args(args)))
    }

    /// Adds a configuration file; its extension picks the parser.
    ///
    /// ```rust,no_run
    /// use bootcfg::service::ConfigResolverBuilder;
    ///
    /// # fn main() -> bootcfg::domain::Result<()> {
    /// let resolver = ConfigResolverBuilder::new()
    ///     .with_file("config/application.properties")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::FileAdapter;
        let adapter = FileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds a `.properties` file whatever its extension.
    #[cfg(feature = "properties")]
    pub fn with_properties_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::{FileAdapter, PropertiesParser};
        let adapter = FileAdapter::with_parser(path, &PropertiesParser::new())?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds a YAML file whatever its extension.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::{FileAdapter, YamlParser};
        let adapter = FileAdapter::with_parser(path, &YamlParser::new())?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Builds the resolver.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateSource`] when two sources share a name.
    pub fn build(mut self) -> Result<ConfigResolver> {
        self.sources
            .sort_by_key(|s| std::cmp::Reverse(s.priority()));

        let mut resolver = ConfigResolver::new();
        for source in self.sources {
            resolver.add_source(source, SourcePosition::Last)?;
        }

        Ok(resolver)
    }
}
