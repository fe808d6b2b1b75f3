//! JSON Emitter
//!
//! Emits one JSON array of diagnostics on flush, for build tooling that
//! maps positions back onto source files.

use std::io::Write;

use serde::Serialize;

use crate::Diagnostic;

use super::DiagnosticEmitter;

#[derive(Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

/// JSON emitter that buffers diagnostics until flushed.
pub struct JsonEmitter<W: Write> {
    writer: W,
    diagnostics: Vec<Diagnostic>,
    summary: Option<Summary>,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            diagnostics: Vec::new(),
            summary: None,
        }
    }

    /// Consume the emitter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn flush(&mut self) {
        let report = Report {
            diagnostics: &self.diagnostics,
            summary: self.summary.take(),
        };
        let _ = serde_json::to_writer_pretty(&mut self.writer, &report);
        let _ = writeln!(self.writer);
        let _ = self.writer.flush();
        self.diagnostics.clear();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        self.summary = Some(Summary {
            errors: error_count,
            warnings: warning_count,
        });
    }
}
