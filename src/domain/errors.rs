// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Every failure that can happen while building a resolver, expanding a
//! placeholder or binding a typed bundle is represented by [`ConfigError`].
//! All of them are fatal at start-up: nothing in this crate retries.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use bootcfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "database.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key was not found in any source and no
    /// default was supplied.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// A source with the same name is already registered.
    #[error("Configuration source '{name}' is already registered")]
    DuplicateSource {
        /// The name shared by both sources
        name: String,
    },

    /// A relative source position referred to a source that is not registered.
    #[error("Configuration source '{name}' is not registered")]
    SourceNotFound {
        /// The name of the missing source
        name: String,
    },

    /// Placeholder expansion revisited a key or exceeded the depth bound.
    #[error("Circular or too deeply nested placeholder reference in '{expression}'")]
    PlaceholderCycle {
        /// The expression being expanded when the cycle was detected
        expression: String,
    },

    /// A typed bundle was missing a required field.
    #[error("Missing required field '{field}' under prefix '{prefix}'")]
    MissingRequiredField {
        /// The bundle prefix
        prefix: String,
        /// The field that could not be resolved
        field: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Builds a [`ConfigError::TypeConversionError`] for `key`.
    pub fn type_conversion<E>(key: impl Into<String>, target_type: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::TypeConversionError {
            key: key.into(),
            target_type: target_type.into(),
            source: Box::new(err),
        }
    }

    /// Shorthand for a [`ConfigError::SourceError`] without an underlying cause.
    pub fn source_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::SourceError {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
