// SPDX-License-Identifier: MIT OR Apache-2.0

//! `${key:default}` placeholder parsing and expansion.
//!
//! A placeholder body is a [`PlaceholderExpression`]: a key, optionally
//! followed by `:` and a default. Defaults may themselves contain
//! placeholders (`a:${b:C}`), and resolved values are expanded again, so
//! expansion is recursive. Recursion is bounded by
//! [`MAX_PLACEHOLDER_DEPTH`] and a key that reappears on its own expansion
//! path is rejected as a cycle.
//!
//! The expander is independent of where values come from: it is handed a
//! lookup function, which the resolver wires to its ordered sources.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};

/// Maximum nesting of placeholder resolutions before expansion gives up.
pub const MAX_PLACEHOLDER_DEPTH: usize = 10;

const PREFIX: &str = "${";
const SUFFIX: char = '}';
const SEPARATOR: char = ':';

/// A parsed placeholder body such as `key` or `key:${inner:fallback}`.
///
/// # Examples
///
/// ```
/// use bootcfg::domain::PlaceholderExpression;
///
/// let expr = PlaceholderExpression::parse("a:${b:C}");
/// assert_eq!(expr.key(), "a");
/// assert_eq!(expr.default_value(), Some("${b:C}"));
///
/// let expr = PlaceholderExpression::parse("${name}.host");
/// assert_eq!(expr.key(), "${name}.host");
/// assert_eq!(expr.default_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderExpression<'a> {
    key: &'a str,
    default: Option<&'a str>,
}

impl<'a> PlaceholderExpression<'a> {
    /// Splits an expression at its first top-level `:`.
    ///
    /// Separators inside nested `${...}` belong to the nested expression.
    pub fn parse(expression: &'a str) -> Self {
        match find_top_level(expression, SEPARATOR) {
            Some(idx) => Self {
                key: &expression[..idx],
                default: Some(&expression[idx + 1..]),
            },
            None => Self {
                key: expression,
                default: None,
            },
        }
    }

    /// The key part, which may still contain placeholders.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The unexpanded default, if one was given.
    pub fn default_value(&self) -> Option<&'a str> {
        self.default
    }
}

/// Finds the byte index of the first `needle` not nested inside braces.
fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            SUFFIX if depth > 0 => depth -= 1,
            c if c == needle && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Finds the `}` that closes a placeholder whose body starts at `body_start`.
fn find_placeholder_end(text: &str, body_start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text[body_start..].char_indices() {
        match c {
            '{' => depth += 1,
            SUFFIX if depth == 0 => return Some(body_start + offset),
            SUFFIX => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Expands placeholders against a lookup function.
///
/// ```
/// use bootcfg::domain::{ConfigKey, ConfigValue, PlaceholderExpander};
///
/// let expander = PlaceholderExpander::new(|key: &ConfigKey| {
///     Ok((key.as_str() == "name").then(|| ConfigValue::from("world")))
/// });
/// assert_eq!(expander.expand("hello ${name}").unwrap(), "hello world");
/// assert_eq!(expander.resolve_expression("missing:fallback").unwrap(), "fallback");
/// ```
pub struct PlaceholderExpander<F> {
    lookup: F,
}

impl<F> PlaceholderExpander<F>
where
    F: Fn(&ConfigKey) -> Result<Option<ConfigValue>>,
{
    /// Creates an expander that resolves keys through `lookup`.
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Replaces every `${...}` in `text`.
    ///
    /// A `${` without a matching `}` is kept literally.
    pub fn expand(&self, text: &str) -> Result<String> {
        self.expand_text(text, &mut Vec::new(), 0)
    }

    /// Resolves a bare expression (`key`, `key:default`), i.e. the body of a
    /// placeholder without the surrounding `${` `}`.
    pub fn resolve_expression(&self, expression: &str) -> Result<String> {
        self.resolve(expression, &mut Vec::new(), 0)
    }

    fn expand_text(&self, text: &str, path: &mut Vec<String>, depth: usize) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PREFIX) {
            let body_start = start + PREFIX.len();
            let Some(end) = find_placeholder_end(rest, body_start) else {
                break;
            };
            out.push_str(&rest[..start]);
            out.push_str(&self.resolve(&rest[body_start..end], path, depth + 1)?);
            rest = &rest[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn resolve(&self, expression: &str, path: &mut Vec<String>, depth: usize) -> Result<String> {
        if depth > MAX_PLACEHOLDER_DEPTH {
            return Err(ConfigError::PlaceholderCycle {
                expression: expression.to_string(),
            });
        }

        let parsed = PlaceholderExpression::parse(expression);
        let key = self.expand_text(parsed.key(), path, depth)?;

        if path.iter().any(|seen| seen == &key) {
            return Err(ConfigError::PlaceholderCycle {
                expression: expression.to_string(),
            });
        }

        match (self.lookup)(&ConfigKey::from(key.as_str()))? {
            Some(value) => {
                path.push(key);
                let expanded = self.expand_text(value.as_str(), path, depth);
                path.pop();
                expanded
            }
            None => match parsed.default_value() {
                Some(default) => self.expand_text(default, path, depth),
                None => {
                    tracing::debug!("Could not resolve placeholder '{}'", expression);
                    Err(ConfigError::ConfigKeyNotFound { key })
                }
            },
        }
    }
}
