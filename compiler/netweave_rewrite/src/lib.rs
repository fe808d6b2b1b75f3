//! Access rewriting for synchronized fields.
//!
//! Once accessors exist for a field, every direct access to it in the module
//! has to go through them, otherwise writes would not mark the field dirty.
//! [`AccessRewriter`] walks method bodies and replaces:
//!
//! - `StoreField f` with a call to the setter of `f`
//! - `LoadField f` with a call to the getter of `f`
//! - `LoadFieldAddress f; InitObj T` with a defaulted temporary passed to the
//!   setter of `f`
//!
//! Any other use of a field address is left alone: the reference would no
//! longer point at the backing storage the accessors maintain.

mod config;
mod rewriter;

pub use config::RewriteConfig;
pub use rewriter::{AccessRewriter, AccessorMaps, RewriteStats};
