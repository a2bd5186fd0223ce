// SPDX-License-Identifier: MIT OR Apache-2.0

//! Java-style `.properties` parser.
//!
//! Supported syntax:
//!
//! - `key=value`, `key: value` and `key value`
//! - `#` and `!` comment lines
//! - a trailing backslash continues the entry on the next line (leading
//!   whitespace of the continuation is dropped)
//! - the escapes `\t`, `\n`, `\r`, `\f` and `\uXXXX`; any other escaped
//!   character stands for itself, so `\=` and `\:` can appear in keys
//!
//! A repeated key keeps its last value.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use std::collections::HashMap;

/// Parser for `.properties` files.
///
/// # Examples
///
/// ```rust
/// use bootcfg::adapters::PropertiesParser;
/// use bootcfg::ports::ConfigParser;
///
/// let content = "# greeting\nmessage-from-application-properties = Hello, world!\n";
/// let result = PropertiesParser::new().parse(content).unwrap();
/// assert_eq!(
///     result.get("message-from-application-properties"),
///     Some(&"Hello, world!".to_string())
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line_number = index + 1;
            let mut line = raw.trim_start().to_string();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            while continues(&line) {
                line.pop();
                match lines.next() {
                    Some((_, next)) => line.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&line);
            result.insert(unescape(key, line_number)?, unescape(value, line_number)?);
        }

        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd number of trailing backslashes marks a continuation.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(|c| c == '=' || c == ':') {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(text: &str, line_number: usize) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| ConfigError::ParseError {
                        message: format!(
                            "Malformed \\uXXXX escape '\\u{}' on line {}",
                            hex, line_number
                        ),
                        source: None,
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> HashMap<String, String> {
        PropertiesParser::new().parse(content).unwrap()
    }

    #[test]
    fn test_properties_separators() {
        let result = parse("a=1\nb: 2\nc 3\nd = 4\ne\t:\t5\n");
        assert_eq!(result.get("a").map(String::as_str), Some("1"));
        assert_eq!(result.get("b").map(String::as_str), Some("2"));
        assert_eq!(result.get("c").map(String::as_str), Some("3"));
        assert_eq!(result.get("d").map(String::as_str), Some("4"));
        assert_eq!(result.get("e").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_properties_comments_and_blank_lines() {
        let result = parse("# comment\n   ! also a comment\n\n   \nkey=value\n");
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_properties_value_keeps_separators_and_trailing_space() {
        let result = parse("url=jdbc:postgres://host:5432/db?a=b\nspaced=  x y  \n");
        assert_eq!(
            result.get("url").map(String::as_str),
            Some("jdbc:postgres://host:5432/db?a=b")
        );
        assert_eq!(result.get("spaced").map(String::as_str), Some("x y  "));
    }

    #[test]
    fn test_properties_continuation() {
        let result = parse("fruits = apple, \\\n         banana, \\\n         pear\nnext=1\n");
        assert_eq!(
            result.get("fruits").map(String::as_str),
            Some("apple, banana, pear")
        );
        assert_eq!(result.get("next").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_properties_escaped_backslash_is_not_continuation() {
        let result = parse("path=C:\\\\temp\\\\\nother=x\n");
        assert_eq!(result.get("path").map(String::as_str), Some("C:\\temp\\"));
        assert_eq!(result.get("other").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_properties_continuation_at_end_of_input() {
        let result = parse("key=value\\");
        assert_eq!(result.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_properties_escapes() {
        let result = parse("tab=a\\tb\nnl=a\\nb\nuni=caf\\u00e9\nkey\\=with\\:seps=v\n");
        assert_eq!(result.get("tab").map(String::as_str), Some("a\tb"));
        assert_eq!(result.get("nl").map(String::as_str), Some("a\nb"));
        assert_eq!(result.get("uni").map(String::as_str), Some("café"));
        assert_eq!(result.get("key=with:seps").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_properties_malformed_unicode_escape() {
        let result = PropertiesParser::new().parse("bad=\\u12G4\n");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));

        let result = PropertiesParser::new().parse("short=\\u12\n");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_properties_key_only_and_empty_value() {
        let result = parse("flag\nempty=\n");
        assert_eq!(result.get("flag").map(String::as_str), Some(""));
        assert_eq!(result.get("empty").map(String::as_str), Some(""));
    }

    #[test]
    fn test_properties_last_duplicate_wins() {
        let result = parse("k=1\nk=2\n");
        assert_eq!(result.get("k").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_properties_crlf_line_endings() {
        let result = parse("a=1\r\nb=2\r\n");
        assert_eq!(result.get("a").map(String::as_str), Some("1"));
        assert_eq!(result.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_properties_supported_extensions() {
        assert!(PropertiesParser::new().supports("properties"));
        assert!(!PropertiesParser::new().supports("yaml"));
    }
}
