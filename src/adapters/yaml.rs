// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML configuration parser.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use std::collections::HashMap;

/// YAML parser implementation.
///
/// Nested mappings are flattened with dots, sequences with their index, so
/// `servers: [a, b]` yields `servers.0` and `servers.1`. Scalars are
/// stringified and `null` becomes the empty string.
///
/// # Examples
///
/// ```rust
/// use bootcfg::adapters::YamlParser;
/// use bootcfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let result = parser.parse("bootiful:\n  message: hi\n  port: 8080").unwrap();
/// assert_eq!(result.get("bootiful.message"), Some(&"hi".to_string()));
/// assert_eq!(result.get("bootiful.port"), Some(&"8080".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn flatten(value: &serde_yaml::Value, prefix: &str, result: &mut HashMap<String, String>) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let segment = match key {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        _ => {
                            tracing::warn!("Skipping YAML entry with a non-scalar key under '{}'", prefix);
                            continue;
                        }
                    };
                    Self::flatten(val, &join(prefix, &segment), result);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    Self::flatten(val, &join(prefix, &i.to_string()), result);
                }
            }
            serde_yaml::Value::String(s) => {
                result.insert(prefix.to_string(), s.clone());
            }
            serde_yaml::Value::Number(n) => {
                result.insert(prefix.to_string(), n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                result.insert(prefix.to_string(), b.to_string());
            }
            serde_yaml::Value::Null => {
                if !prefix.is_empty() {
                    result.insert(prefix.to_string(), String::new());
                }
            }
            serde_yaml::Value::Tagged(tagged) => Self::flatten(&tagged.value, prefix, result),
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut result = HashMap::new();
        Self::flatten(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_parser_simple() {
        let result = YamlParser::new().parse("key: value").unwrap();
        assert_eq!(result.get("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_yaml_parser_deeply_nested() {
        let yaml = r#"
spring:
  cloud:
    config:
      uri: http://localhost:8888
"#;
        let result = YamlParser::new().parse(yaml).unwrap();
        assert_eq!(
            result.get("spring.cloud.config.uri"),
            Some(&"http://localhost:8888".to_string())
        );
    }

    #[test]
    fn test_yaml_parser_sequences() {
        let yaml = r#"
servers:
  - server1
  - name: server2
    port: 81
"#;
        let result = YamlParser::new().parse(yaml).unwrap();
        assert_eq!(result.get("servers.0"), Some(&"server1".to_string()));
        assert_eq!(result.get("servers.1.name"), Some(&"server2".to_string()));
        assert_eq!(result.get("servers.1.port"), Some(&"81".to_string()));
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let yaml = r#"
string_value: hello
number_value: 42
float_value: 1.5
bool_value: true
null_value: null
8080: numeric-key
"#;
        let result = YamlParser::new().parse(yaml).unwrap();
        assert_eq!(result.get("string_value"), Some(&"hello".to_string()));
        assert_eq!(result.get("number_value"), Some(&"42".to_string()));
        assert_eq!(result.get("float_value"), Some(&"1.5".to_string()));
        assert_eq!(result.get("bool_value"), Some(&"true".to_string()));
        assert_eq!(result.get("null_value"), Some(&"".to_string()));
        assert_eq!(result.get("8080"), Some(&"numeric-key".to_string()));
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        let result = YamlParser::new().parse("").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let result = YamlParser::new().parse("invalid: yaml: content:");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::new();
        assert!(parser.supports("yaml"));
        assert!(parser.supports("YML"));
        assert!(!parser.supports("properties"));
    }
}
