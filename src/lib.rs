// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration resolution in the style of Spring Boot.
//!
//! Values are looked up by dotted key across an ordered list of sources.
//! The first source that has the key wins, so a command-line
//! `--server.port=9000` shadows an environment variable `SERVER_PORT`,
//! which in turn shadows `server.port` in `application.properties`.
//! On top of plain lookup the crate expands `${key:default}` placeholders
//! and binds every key under a prefix into a `serde` struct.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: keys, values, errors, placeholder expansion and binding
//! - **Ports**: the traits at the edges (`ConfigSource`, `ConfigParser`, `OutputSink`)
//! - **Adapters**: concrete sources (files, env vars, CLI, config server) and sinks
//! - **Service**: [`ConfigResolver`](service::ConfigResolver), which orders sources and answers lookups
//! - **Tutorials**: the small demo programs driven by the `bootcfg` binary
//!
//! # Feature Flags
//!
//! - `yaml`: YAML file support (default)
//! - `properties`: `.properties` file support (default)
//! - `env`: environment variable source (default)
//! - `cli`: `--key=value` argument source (default)
//! - `tutorials`: the tutorial programs and the `bootcfg` binary (default)
//! - `remote`: Spring Cloud Config server client
//! - `full`: everything
//!
//! # Quick Start
//!
//! ```rust
//! use bootcfg::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! # fn main() -> bootcfg::domain::Result<()> {
//! let resolver = ConfigResolver::builder()
//!     .with_values("overrides", [("server.port", "${port:9090}")])
//!     .with_values("defaults", [("server.host", "localhost"), ("server.port", "8080")])
//!     .build()?;
//!
//! let server: Server = resolver.bind_typed("server")?.bind()?;
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 9090);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
#[cfg(feature = "tutorials")]
pub mod tutorials;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigValue, ConfigurationProperties, ConfigurationService,
        Result, TypedConfigurationBundle,
    };
    pub use crate::ports::{ConfigParser, ConfigSource, OutputSink};
    pub use crate::service::{ConfigResolver, ConfigResolverBuilder, SourcePosition};

    // Re-export adapters based on feature flags
    pub use crate::adapters::{FileAdapter, MapSource};
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "remote")]
    pub use crate::adapters::{ConfigServerAdapter, ConfigServerOptions};
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "properties")]
    pub use crate::adapters::PropertiesParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
