// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! A `ConfigParser` turns the text of a configuration file into a flat
//! key/value map. The file source picks a parser by file extension.

use crate::domain::Result;
use std::collections::HashMap;

/// A trait for parsing configuration files.
///
/// # Key Format
///
/// Parsers flatten nested structures using dot notation. A YAML document
///
/// ```yaml
/// bootiful:
///   message: hi
/// ```
///
/// and the properties line `bootiful.message=hi` both produce the key
/// `bootiful.message`.
///
/// # Examples
///
/// ```rust
/// use bootcfg::ports::ConfigParser;
/// use bootcfg::domain::Result;
/// use std::collections::HashMap;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
///         Ok(content
///             .lines()
///             .filter_map(|l| l.split_once(' '))
///             .map(|(k, v)| (k.to_string(), v.to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let parsed = LineParser.parse("a 1\nb 2").unwrap();
/// assert_eq!(parsed.get("b"), Some(&"2".to_string()));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a flat key-value map.
    fn parse(&self, content: &str) -> Result<HashMap<String, String>>;

    /// Returns the file extensions (without the leading dot) this parser
    /// handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` when `extension` is one of the supported extensions,
    /// ignoring ASCII case.
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
