// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output sink implementations.

use crate::ports::OutputSink;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Logs each line at INFO through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Prints each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line) {
            tracing::warn!("Failed to write to stdout: {}", e);
        }
    }
}

/// Records lines in memory.
///
/// ```rust
/// use bootcfg::adapters::MemorySink;
/// use bootcfg::ports::OutputSink;
///
/// let sink = MemorySink::new();
/// sink.emit("hello");
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every line emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_sink_through_reference_and_box() {
        let sink = MemorySink::new();
        {
            let by_ref: &dyn OutputSink = &sink;
            by_ref.emit("via ref");
            let boxed: Box<&MemorySink> = Box::new(&sink);
            boxed.emit("via box");
        }
        assert_eq!(sink.lines(), vec!["via ref", "via box"]);
    }

    #[test]
    fn test_tracing_and_stdout_sinks_do_not_panic() {
        TracingSink.emit("to tracing");
        StdoutSink.emit("to stdout");
    }
}
