// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration source implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: configuration sources, file parsers and output sinks.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "remote")]
pub mod config_server;
#[cfg(feature = "env")]
pub mod env_var;
pub mod file;
pub mod memory;
#[cfg(feature = "properties")]
pub mod properties;
pub mod sinks;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
#[cfg(feature = "remote")]
pub use config_server::{ConfigServerAdapter, ConfigServerOptions};
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
pub use file::FileAdapter;
pub use memory::MapSource;
#[cfg(feature = "properties")]
pub use properties::PropertiesParser;
pub use sinks::{MemorySink, StdoutSink, TracingSink};
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
