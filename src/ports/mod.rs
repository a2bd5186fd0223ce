// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between the resolver and the outside world:
//! where values come from, how files are parsed, and where output goes.

pub mod parser;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use sink::OutputSink;
pub use source::ConfigSource;
