//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Exact-duplicate suppression (a type reached from many fields reports once)
//! - Error/warning counts for pass/fail decisions
//! - Stable ordering by document, line and column on flush

use rustc_hash::FxHashSet;

use crate::Diagnostic;

/// Queue for collecting diagnostics over one weave pass.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.push(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    /// Collected diagnostics, in arrival order.
    diagnostics: Vec<Diagnostic>,
    /// Diagnostics already queued, for duplicate suppression.
    seen: FxHashSet<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Count of warnings.
    warning_count: usize,
}

impl DiagnosticQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if an identical
    /// diagnostic was already queued.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        if !self.seen.insert(diag.clone()) {
            return false;
        }
        if diag.is_error() {
            self.error_count += 1;
        } else if diag.is_warning() {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Add every diagnostic from an iterator.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of warnings collected.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Check if any error-severity diagnostic was collected.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by position and return them.
    ///
    /// Unpositioned diagnostics come first, in arrival order. Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by(|a, b| {
            let key = |d: &Diagnostic| {
                d.position
                    .as_ref()
                    .map(|p| (p.document.clone(), p.line, p.column))
            };
            key(a).cmp(&key(b))
        });

        self.seen.clear();
        self.error_count = 0;
        self.warning_count = 0;

        result
    }
}
