// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved configuration values.
//!
//! Every source hands back strings; [`ConfigValue`] keeps that string and
//! offers typed views of it at the point of use.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_accessors {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Parses the value as `", stringify!($ty), "`.")]
            pub fn $method(&self, key: &str) -> Result<$ty> {
                self.parse::<$ty>(key)
            }
        )*
    };
}

/// A resolved configuration value.
///
/// # Examples
///
/// ```
/// use bootcfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from("8080");
/// assert_eq!(value.as_str(), "8080");
/// assert_eq!(value.as_u32("server.port").unwrap(), 8080);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the value.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Consumes the value and returns the inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Converts the value to a boolean.
    ///
    /// Accepts `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0`, ignoring
    /// case and surrounding whitespace.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            other => other
                .parse::<bool>()
                .map_err(|e| ConfigError::type_conversion(key, "bool", e)),
        }
    }

    numeric_accessors! {
        as_i32 => i32,
        as_i64 => i64,
        as_u32 => u32,
        as_u64 => u64,
        as_f64 => f64,
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bootcfg::domain::config_value::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("server.address").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::type_conversion(key, std::any::type_name::<T>(), e))
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
