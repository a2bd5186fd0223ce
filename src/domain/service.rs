// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! `ConfigurationService` is the read side of the configuration system: key
//! lookups with fallbacks, placeholder expansion and typed binding. Only
//! [`resolve`](ConfigurationService::resolve) and
//! [`bind_typed`](ConfigurationService::bind_typed) need implementing; the
//! rest is derived from them.

use crate::domain::{
    ConfigError, ConfigKey, ConfigValue, ConfigurationProperties, PlaceholderExpander, Result,
    TypedConfigurationBundle,
};

/// The main configuration service trait.
///
/// # Examples
///
/// ```rust
/// use bootcfg::domain::{ConfigKey, ConfigValue, ConfigurationService, Result, TypedConfigurationBundle};
///
/// struct Fixed;
///
/// impl ConfigurationService for Fixed {
///     fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "name").then(|| ConfigValue::from("bootiful")))
///     }
///
///     fn bind_typed(&self, prefix: &str) -> Result<TypedConfigurationBundle> {
///         Ok(TypedConfigurationBundle::new(prefix))
///     }
/// }
///
/// let service = Fixed;
/// assert_eq!(service.expand("hello ${name}").unwrap(), "hello bootiful");
/// assert_eq!(service.resolve_with_default(&ConfigKey::from("x"), "D").unwrap().as_str(), "D");
/// ```
pub trait ConfigurationService {
    /// Returns the value of the highest-priority source that has `key`, or
    /// `None` when no source does.
    fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// Collects every key under `prefix` into a typed bundle.
    fn bind_typed(&self, prefix: &str) -> Result<TypedConfigurationBundle>;

    /// Like [`resolve`](Self::resolve), falling back to `default`.
    ///
    /// The default is returned verbatim; placeholders in it are not expanded.
    fn resolve_with_default(&self, key: &ConfigKey, default: &str) -> Result<ConfigValue> {
        Ok(self
            .resolve(key)?
            .unwrap_or_else(|| ConfigValue::from(default)))
    }

    /// Like [`resolve`](Self::resolve), failing with
    /// [`ConfigError::ConfigKeyNotFound`] when the key is absent.
    fn resolve_required(&self, key: &ConfigKey) -> Result<ConfigValue> {
        self.resolve(key)?
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.as_str().to_string(),
            })
    }

    /// Checks whether any source has `key`.
    ///
    /// A failing source is an error, not an absent key.
    fn contains(&self, key: &ConfigKey) -> Result<bool> {
        Ok(self.resolve(key)?.is_some())
    }

    /// Resolves a placeholder body such as `key`, `key:default` or
    /// `key:${other:fallback}`.
    ///
    /// The default is only evaluated when `key` is absent.
    fn resolve_placeholder(&self, expression: &str) -> Result<String> {
        PlaceholderExpander::new(|key: &ConfigKey| self.resolve(key)).resolve_expression(expression)
    }

    /// Replaces every `${...}` placeholder in `text`.
    fn expand(&self, text: &str) -> Result<String> {
        PlaceholderExpander::new(|key: &ConfigKey| self.resolve(key)).expand(text)
    }

    /// Binds `T` from the keys under [`ConfigurationProperties::PREFIX`].
    fn bind_properties<T>(&self) -> Result<T>
    where
        T: ConfigurationProperties,
        Self: Sized,
    {
        self.bind_typed(T::PREFIX)?.bind()
    }
}
