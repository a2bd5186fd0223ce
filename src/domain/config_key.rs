// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype.
//!
//! Keys are dotted, optionally kebab-cased strings such as
//! `bootiful.message` or `message-from-application-properties`.

use std::fmt;

/// A type-safe wrapper for configuration keys.
///
/// # Examples
///
/// ```
/// use bootcfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("bootiful.message");
/// assert_eq!(key.as_str(), "bootiful.message");
/// assert_eq!(key.strip_prefix("bootiful").unwrap().as_str(), "message");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the dot-separated segments of the key.
    ///
    /// ```
    /// use bootcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("a.b-c.d");
    /// assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a", "b-c", "d"]);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Returns the remainder of the key after `prefix.`, if the key lives
    /// under that prefix.
    ///
    /// The comparison ignores ASCII case so `Bootiful.Message` is found under
    /// `bootiful`.
    pub fn strip_prefix(&self, prefix: &str) -> Option<ConfigKey> {
        let prefix = prefix.trim_end_matches('.');
        if prefix.is_empty() {
            return Some(self.clone());
        }
        let head = self.0.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = self.0[prefix.len()..].strip_prefix('.')?;
        if rest.is_empty() {
            None
        } else {
            Some(ConfigKey(rest.to_string()))
        }
    }

    /// Canonical form used for relaxed matching: upper case, with `.` and `-`
    /// folded to `_`.
    ///
    /// ```
    /// use bootcfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("message-from.application");
    /// assert_eq!(key.relaxed(), "MESSAGE_FROM_APPLICATION");
    /// ```
    pub fn relaxed(&self) -> String {
        relaxed_name(&self.0)
    }
}

/// Folds a key or environment variable name into the relaxed form used for
/// case-insensitive, separator-insensitive matching.
pub(crate) fn relaxed_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
