// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration resolver.
//!
//! [`ConfigResolver`] implements the `ConfigurationService` trait over an
//! ordered list of sources and is the main entry point of the crate.

pub mod resolver;

// Re-export commonly used types
pub use resolver::{ConfigResolver, ConfigResolverBuilder, SourcePosition};
