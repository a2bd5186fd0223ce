// SPDX-License-Identifier: MIT OR Apache-2.0

//! Start-up runners demonstrating each way of reading configuration.
//!
//! Every tutorial has a composition function, which builds the resolver from
//! a [`TutorialContext`], and a runner, which resolves its values and emits
//! one line per value to an [`OutputSink`].

pub mod bootiful;

pub use bootiful::{BootifulProperties, BootifulPropertySource};

use crate::domain::{ConfigKey, ConfigurationService, Result};
use crate::ports::OutputSink;
use crate::service::{ConfigResolver, SourcePosition};
use std::fmt;
use std::path::PathBuf;

/// Key read by the basic and value tutorials.
pub const APPLICATION_MESSAGE_KEY: &str = "message-from-application-properties";

/// Key read by the config-client tutorial.
pub const CONFIG_SERVER_MESSAGE_KEY: &str = "message-from-config-server";

/// The available tutorials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tutorial {
    /// Direct key lookup
    Basic,
    /// Placeholder expressions with defaults
    Value,
    /// A custom source added after the others
    #[value(name = "propertysource")]
    PropertySource,
    /// Typed binding of a prefix
    ConfigurationProperties,
    /// Values fetched from a remote config server
    ConfigClient,
}

impl Tutorial {
    /// Every tutorial, in presentation order.
    pub const ALL: [Tutorial; 5] = [
        Tutorial::Basic,
        Tutorial::Value,
        Tutorial::PropertySource,
        Tutorial::ConfigurationProperties,
        Tutorial::ConfigClient,
    ];

    /// The command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Tutorial::Basic => "basic",
            Tutorial::Value => "value",
            Tutorial::PropertySource => "propertysource",
            Tutorial::ConfigurationProperties => "configuration-properties",
            Tutorial::ConfigClient => "config-client",
        }
    }

    /// Builds this tutorial's resolver from `context`.
    pub fn compose(self, context: &TutorialContext) -> Result<ConfigResolver> {
        match self {
            Tutorial::Basic | Tutorial::Value | Tutorial::ConfigurationProperties => {
                compose_local(context)
            }
            Tutorial::PropertySource => compose_propertysource(context),
            Tutorial::ConfigClient => compose_config_client(context),
        }
    }

    /// Runs this tutorial against an already built resolver.
    pub fn run_with(self, resolver: &ConfigResolver, sink: &dyn OutputSink) -> Result<()> {
        match self {
            Tutorial::Basic => run_basic(resolver, sink),
            Tutorial::Value => run_value(resolver, sink),
            Tutorial::PropertySource => run_propertysource(resolver, sink),
            Tutorial::ConfigurationProperties => run_configuration_properties(resolver, sink),
            Tutorial::ConfigClient => run_config_client(resolver, sink),
        }
    }

    /// Composes the resolver, then runs the tutorial.
    pub fn run(self, context: &TutorialContext, sink: &dyn OutputSink) -> Result<()> {
        tracing::debug!("Running tutorial '{}'", self);
        let resolver = self.compose(context)?;
        tracing::debug!("Sources: {:?}", resolver.source_names());
        self.run_with(&resolver, sink)
    }
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs shared by the composition functions.
#[derive(Debug, Clone, Default)]
pub struct TutorialContext {
    /// Configuration file to load, if any
    pub config_file: Option<PathBuf>,
    /// Whether the process environment is a source
    pub use_env: bool,
    /// `--key=value` style overrides, highest priority
    pub overrides: Vec<String>,
    /// Config server URI, overriding `spring.cloud.config.uri`
    pub config_server: Option<String>,
    /// Application name, overriding `spring.application.name`
    pub application: Option<String>,
    /// Profile, overriding `spring.profiles.active`
    pub profile: Option<String>,
}

impl TutorialContext {
    /// An empty context: no file, no environment, no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Enables or disables the environment source.
    pub fn with_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    /// Adds command-line overrides.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.extend(overrides.into_iter().map(Into::into));
        self
    }
}

/// Command-line overrides, environment and the configuration file.
pub fn compose_local(context: &TutorialContext) -> Result<ConfigResolver> {
    let mut builder = ConfigResolver::builder().with_cli_args(context.overrides.clone());

    if context.use_env {
        builder = builder.with_env_vars();
    }
    if let Some(path) = &context.config_file {
        builder = builder.with_file(path)?;
    }

    builder.build()
}

/// The local sources plus [`BootifulPropertySource`] at the end.
pub fn compose_propertysource(context: &TutorialContext) -> Result<ConfigResolver> {
    let mut resolver = compose_local(context)?;
    resolver.add_source(Box::new(BootifulPropertySource), SourcePosition::Last)?;
    Ok(resolver)
}

/// The local sources plus the remote config server, placed ahead of the
/// configuration file.
#[cfg(feature = "remote")]
pub fn compose_config_client(context: &TutorialContext) -> Result<ConfigResolver> {
    use crate::adapters::config_server::{ConfigServerAdapter, ConfigServerOptions, DEFAULT_URI};
    use crate::ports::ConfigSource;

    let mut resolver = compose_local(context)?;

    let setting = |explicit: &Option<String>, key: &str, default: &str| -> Result<String> {
        match explicit {
            Some(value) => Ok(value.clone()),
            None => Ok(resolver
                .resolve_with_default(&ConfigKey::from(key), default)?
                .into_string()),
        }
    };
    let application = setting(&context.application, "spring.application.name", "application")?;
    let uri = setting(&context.config_server, "spring.cloud.config.uri", DEFAULT_URI)?;
    let profiles = setting(&context.profile, "spring.profiles.active", "default")?;

    let mut options = ConfigServerOptions::new(uri, application)
        .with_profiles(profiles.split(',').map(str::trim));
    if let Some(label) = resolver.resolve(&ConfigKey::from("spring.cloud.config.label"))? {
        options = options.with_label(label.into_string());
    }

    tracing::info!("Fetching config from server at: {}", options.uri);
    let remote = ConfigServerAdapter::fetch_blocking(&options)?;

    let position = resolver
        .source_names()
        .into_iter()
        .find(|name| {
            resolver
                .source(name)
                .is_some_and(|s| s.priority() <= remote.priority())
        })
        .map(|name| SourcePosition::Before(name.to_string()))
        .unwrap_or(SourcePosition::Last);

    resolver.add_source(Box::new(remote), position)?;
    Ok(resolver)
}

/// Without the `remote` feature there is no config server client.
#[cfg(not(feature = "remote"))]
pub fn compose_config_client(_context: &TutorialContext) -> Result<ConfigResolver> {
    Err(crate::domain::ConfigError::source_error(
        "configserver",
        "this build has no config server support (enable the `remote` feature)",
    ))
}

/// Emits the value of [`APPLICATION_MESSAGE_KEY`] with its placeholders
/// expanded, or `null`.
pub fn run_basic(resolver: &ConfigResolver, sink: &dyn OutputSink) -> Result<()> {
    let message = match resolver.resolve(&ConfigKey::from(APPLICATION_MESSAGE_KEY))? {
        Some(value) => resolver.expand(value.as_str())?,
        None => "null".to_string(),
    };
    sink.emit(&format!("message from application.properties {}", message));
    Ok(())
}

/// Emits an existing and a misspelled key, both with defaults.
pub fn run_value(resolver: &ConfigResolver, sink: &dyn OutputSink) -> Result<()> {
    let value_does_exist = resolver.expand("${message-from-application-properties:OOPS!}")?;
    let value_does_not_exist = resolver
        .expand("${mesage-from-application-properties:${default-error-message:YIKES!}}")?;

    sink.emit(&format!("message from application.properties {}", value_does_exist));
    sink.emit(&format!(
        "missing message from application.properties {}",
        value_does_not_exist
    ));
    Ok(())
}

/// Emits the value served by [`BootifulPropertySource`].
pub fn run_propertysource(resolver: &ConfigResolver, sink: &dyn OutputSink) -> Result<()> {
    let bootiful_message = resolver.expand("${bootiful-message:ERROR!!!}")?;
    sink.emit(&format!("message from custom property source {}", bootiful_message));
    Ok(())
}

/// Emits `bootiful.message` after binding [`BootifulProperties`].
pub fn run_configuration_properties(
    resolver: &ConfigResolver,
    sink: &dyn OutputSink,
) -> Result<()> {
    let properties: BootifulProperties = resolver.bind_properties()?;
    sink.emit(&format!(
        "message from @ConfigurationProperties {}",
        properties.message
    ));
    Ok(())
}

/// Emits [`CONFIG_SERVER_MESSAGE_KEY`]; there is no default, so a missing
/// value is an error.
pub fn run_config_client(resolver: &ConfigResolver, sink: &dyn OutputSink) -> Result<()> {
    let config_server = resolver.expand("${message-from-config-server}")?;
    sink.emit(&format!(
        "message from the Spring Cloud Config Server: {}",
        config_server
    ));
    Ok(())
}
