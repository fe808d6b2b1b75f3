//! Reference resolution for weave passes.
//!
//! An [`AssemblyResolver`] maps a module name to its loaded definition:
//!
//! 1. The module under weave resolves to [`Resolved::Current`].
//! 2. Declared reference paths are searched by file name (`name.dll`, `name.exe`).
//! 3. Failing that, every distinct directory among the references is searched,
//!    which finds modules that are only referenced transitively.
//!
//! Loaded modules are cached by canonical path and modification time. A
//! module rewritten by an earlier pass gets a new key and is read again.
//! The cache lives exactly as long as the resolver, which lives exactly as
//! long as one weave pass.

mod error;
mod resolver;

pub use error::AssemblyLoadError;
pub use resolver::{AssemblyResolver, CacheKey, Resolved, ResolverConfig};
