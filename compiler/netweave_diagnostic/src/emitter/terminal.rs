//! Build-log output.
//!
//! One line per diagnostic in the `file(line,column): severity CODE: message`
//! form build hosts and editors pick up, followed by indented notes and help.

use std::io::{self, IsTerminal, Write};

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

const RESET: &str = "\x1b[0m";

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[1;31m",
        Severity::Warning => "\x1b[1;33m",
        Severity::Note => "\x1b[1;36m",
    }
}

/// Writes diagnostics as build-log lines, coloring the severity on request.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl TerminalEmitter<io::Stderr> {
    /// Emitter on stderr; colored when stderr is a terminal and `NO_COLOR`
    /// is unset.
    pub fn stderr() -> Self {
        let colored = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        TerminalEmitter::new(io::stderr(), colored)
    }
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colored: bool) -> Self {
        TerminalEmitter { writer, colored }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn severity(&self, severity: Severity) -> String {
        if self.colored {
            format!("{}{severity}{RESET}", severity_color(severity))
        } else {
            severity.to_string()
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let origin = match &diagnostic.position {
            Some(at) => format!("{}({},{})", at.document, at.line, at.column),
            None => "netweave".to_string(),
        };
        let severity = self.severity(diagnostic.severity);
        let _ = writeln!(
            self.writer,
            "{origin}: {severity} {}: {}",
            diagnostic.code, diagnostic.message
        );
        for note in &diagnostic.notes {
            let _ = writeln!(self.writer, "    note: {note}");
        }
        for suggestion in &diagnostic.suggestions {
            let _ = writeln!(self.writer, "    help: {suggestion}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let outcome = if error_count > 0 {
            "weave failed"
        } else {
            "weave succeeded"
        };
        let _ = writeln!(
            self.writer,
            "{outcome}: {error_count} error(s), {warning_count} warning(s)"
        );
    }
}
