//! Command handlers for the `netweave` CLI.
//!
//! Each handler returns the process exit code; `main` only dispatches.

mod inspect;
mod weave;

use netweave_diagnostic::emitter::{DiagnosticEmitter, JsonEmitter, TerminalEmitter};
use netweave_diagnostic::Diagnostic;

pub use inspect::inspect_module;
pub use weave::{weave_module, WeaveArgs};

/// Print `diagnostics` as JSON on stdout or as text on stderr.
fn report(diagnostics: &[Diagnostic], json: bool) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();

    let mut emitter: Box<dyn DiagnosticEmitter> = if json {
        Box::new(JsonEmitter::new(std::io::stdout()))
    } else {
        Box::new(TerminalEmitter::stderr())
    };

    emitter.emit_all(diagnostics);
    if json || errors + warnings > 0 {
        emitter.emit_summary(errors, warnings);
    }
    emitter.flush();
}

#[cfg(test)]
mod tests;
