//! Diagnostic Emitters
//!
//! Provides different output formats for diagnostics:
//! - Terminal: build-log lines, optionally colored
//! - JSON: Machine-readable output for build tooling

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::TerminalEmitter;

use crate::Diagnostic;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}
