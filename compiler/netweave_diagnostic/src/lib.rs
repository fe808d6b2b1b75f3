//! Diagnostic system for weave passes.
//!
//! Every problem the weaver finds becomes a [`Diagnostic`]:
//! - an error code for searchability
//! - a message saying what went wrong
//! - an optional sequence point saying where
//! - notes and suggestions saying why and how to fix it
//!
//! A pass collects diagnostics in a [`DiagnosticQueue`] instead of stopping
//! at the first problem, so one bad type never hides another. The governing
//! build step reads [`DiagnosticQueue::has_errors`] to decide pass/fail.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
