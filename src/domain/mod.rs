// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! Keys, values, errors, placeholder expansion and typed binding live here.
//! Nothing in this layer knows where configuration comes from.

pub mod binding;
pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod placeholder;
pub mod service;

// Re-export commonly used types
pub use binding::{ConfigurationProperties, TypedConfigurationBundle};
pub use config_key::ConfigKey;
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use placeholder::{PlaceholderExpander, PlaceholderExpression, MAX_PLACEHOLDER_DEPTH};
pub use service::ConfigurationService;
