// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output sink port.
//!
//! Start-up runners report what they resolved through an `OutputSink` handed
//! to them by the caller, never through a global logger.

/// Receives one line per resolved value.
pub trait OutputSink {
    /// Emits a single line.
    fn emit(&self, line: &str);
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}
