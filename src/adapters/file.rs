// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file source adapter.
//!
//! This module provides an adapter that reads configuration values from a
//! `.properties` or `.yaml`/`.yml` file, picking the parser from the file
//! extension.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File names probed, in order, by [`FileAdapter::from_default_location`].
pub const DEFAULT_FILE_NAMES: &[&str] = &[
    "application.properties",
    "application.yaml",
    "application.yml",
    "config.yaml",
];

const SOURCE_NAME: &str = "file";

/// Configuration source adapter for configuration files.
///
/// The file is read and parsed once, at construction. The source is named
/// `file:<file name>` unless renamed with [`FileAdapter::with_name`].
///
/// # Priority
///
/// Files have a priority of 1, which means they are overridden by both
/// environment variables (priority 2) and command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust,no_run
/// use bootcfg::adapters::FileAdapter;
/// use bootcfg::ports::ConfigSource;
///
/// // Load from a specific file
/// let adapter = FileAdapter::from_file("config/application.properties").unwrap();
/// assert_eq!(adapter.name(), "file:application.properties");
///
/// // Load from default OS location
/// let adapter = FileAdapter::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileAdapter {
    name: String,
    /// Canonical path of the file
    file_path: PathBuf,
    /// Parsed configuration values
    values: HashMap<String, String>,
}

impl FileAdapter {
    /// Loads a file, choosing the parser from its extension.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::ParseError`] when no enabled parser handles
    /// the extension, and with [`ConfigError::SourceError`] when the file
    /// cannot be read or exceeds the size limit.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let parser = parser_for(extension).ok_or_else(|| ConfigError::ParseError {
            message: format!(
                "Unsupported configuration file extension '{}': {}",
                extension,
                display_name(path)
            ),
            source: None,
        })?;

        Self::with_parser(path, parser.as_ref())
    }

    /// Loads a file with an explicit parser, ignoring its extension.
    pub fn with_parser<P: AsRef<Path>>(path: P, parser: &dyn ConfigParser) -> Result<Self> {
        let file_path = path.as_ref();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Invalid or inaccessible path: {}", display_name(file_path)),
            source: Some(Box::new(e)),
        })?;

        let content = read_capped(&canonical_path)?;
        let values = parser.parse(&content)?;

        tracing::debug!(
            "Loaded {} properties from {}",
            values.len(),
            canonical_path.display()
        );

        Ok(Self {
            name: format!("{}:{}", SOURCE_NAME, display_name(&canonical_path)),
            file_path: canonical_path,
            values,
        })
    }

    /// Loads the first of [`DEFAULT_FILE_NAMES`] found in the OS-appropriate
    /// configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let config_dir = default_config_dir(app_name, qualifier)?;

        let found = DEFAULT_FILE_NAMES
            .iter()
            .map(|name| config_dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "No configuration file found in {}",
                    config_dir.display()
                ),
                source: None,
            })?;

        Self::from_file(found)
    }

    /// Loads `filename` from the OS-appropriate configuration directory.
    ///
    /// ```rust,no_run
    /// use bootcfg::adapters::FileAdapter;
    ///
    /// let adapter = FileAdapter::with_filename("myapp", "com.example", "settings.yaml").unwrap();
    /// ```
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let config_dir = default_config_dir(app_name, qualifier)?;
        Self::from_file(config_dir.join(filename))
    }

    /// Renames the source.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the canonical path of the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Returns the OS-appropriate configuration directory for an application.
pub fn default_config_dir(app_name: &str, qualifier: &str) -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: "Failed to determine project directories".to_string(),
            source: None,
        })?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Returns `true` when an enabled parser handles the file's extension.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(parser_for)
        .is_some()
}

fn parser_for(extension: &str) -> Option<Box<dyn ConfigParser>> {
    #[allow(unused_mut)]
    let mut parsers: Vec<Box<dyn ConfigParser>> = Vec::new();
    #[cfg(feature = "properties")]
    parsers.push(Box::new(super::PropertiesParser::new()));
    #[cfg(feature = "yaml")]
    parsers.push(Box::new(super::YamlParser::new()));

    parsers.into_iter().find(|p| p.supports(extension))
}

fn read_capped(path: &Path) -> Result<String> {
    // Check file size before reading to prevent DoS via large files
    let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read file metadata: {}", display_name(path)),
        source: Some(Box::new(e)),
    })?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
            source: None,
        });
    }

    fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read configuration file: {}", display_name(path)),
        source: Some(Box::new(e)),
    })
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

impl ConfigSource for FileAdapter {
    fn name(&self) -> &str {
        &self.name
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
