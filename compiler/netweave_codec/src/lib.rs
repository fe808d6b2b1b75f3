//! Codec synthesis for networked data types.
//!
//! Given a type, a [`CodecSynthesizer`] returns the function that writes or
//! reads it: one already in its [`FunctionRegistry`], one a referenced module
//! already generated (found through the generated-marker), or a new one
//! generated into the module under weave.
//!
//! # Pass state
//!
//! Everything a pass shares lives in a [`WeaveContext`]: the module being
//! mutated, the reference resolver, the networked-object classification
//! collaborator, memoized [`TypeDescription`]s and the diagnostic queue.
//! Nothing here is process-wide; a context and its synthesizers belong to
//! exactly one weave pass.
//!
//! # Execution
//!
//! Generated codecs are structured [`CodecBody`](netweave_ir::CodecBody)
//! values. The [`vm`] module executes them over a byte stream, which is how
//! the wire format is pinned down and tested.

mod builtins;
mod classify;
mod config;
mod context;
mod error;
mod registry;
mod synthesizer;
pub mod vm;

#[cfg(test)]
mod fixtures;

pub use classify::{BaseTypeModel, NetworkModel, TypeDescription};
pub use config::CodecConfig;
pub use context::WeaveContext;
pub use error::{CodecError, UnsupportedReason};
pub use registry::FunctionRegistry;
pub use synthesizer::CodecSynthesizer;
