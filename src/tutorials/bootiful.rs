// SPDX-License-Identifier: MIT OR Apache-2.0

//! Types owned by the tutorials: a hand-written source and a bound
//! properties struct.

use crate::domain::{ConfigKey, ConfigValue, ConfigurationProperties, Result};
use crate::ports::ConfigSource;
use serde::Deserialize;

/// The only key [`BootifulPropertySource`] answers.
pub const BOOTIFUL_MESSAGE_KEY: &str = "bootiful-message";

/// A source computed in code instead of read from anywhere.
///
/// It is named `bootiful` and answers [`BOOTIFUL_MESSAGE_KEY`], ignoring
/// case, with a fixed greeting.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootifulPropertySource;

impl BootifulPropertySource {
    /// The greeting returned for [`BOOTIFUL_MESSAGE_KEY`].
    pub const MESSAGE: &'static str = "Hello from BootifulPropertySource!";
}

impl ConfigSource for BootifulPropertySource {
    fn name(&self) -> &str {
        "bootiful"
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(key
            .as_str()
            .eq_ignore_ascii_case(BOOTIFUL_MESSAGE_KEY)
            .then(|| ConfigValue::from(Self::MESSAGE)))
    }

    fn all_keys(&self) -> Result<Vec<ConfigKey>> {
        Ok(vec![ConfigKey::from(BOOTIFUL_MESSAGE_KEY)])
    }
}

/// Properties bound from the `bootiful` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootifulProperties {
    /// `bootiful.message`
    pub message: String,
}

impl ConfigurationProperties for BootifulProperties {
    const PREFIX: &'static str = "bootiful";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootiful_source_ignores_case() {
        let source = BootifulPropertySource;
        assert_eq!(source.name(), "bootiful");
        assert_eq!(source.priority(), 0);
        for key in ["bootiful-message", "BOOTIFUL-MESSAGE", "Bootiful-Message"] {
            assert_eq!(
                source.get_str(key).unwrap().unwrap().as_str(),
                "Hello from BootifulPropertySource!"
            );
        }
        assert!(source.get_str("bootiful.message").unwrap().is_none());
    }
}
