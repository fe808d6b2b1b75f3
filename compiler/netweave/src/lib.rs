//! Netweave: the build-time weaving pipeline.
//!
//! One [`Weaver::weave`] call processes one compiled module:
//!
//! 1. Built-in and user-supplied codecs are registered.
//! 2. Message types get writers and readers.
//! 3. Synchronized fields of networked behaviours get accessors, dirty bits
//!    and serialization methods.
//! 4. Direct accesses to those fields are rewritten into accessor calls.
//!
//! Problems are collected as diagnostics; a pass with any error produces no
//! module.

pub mod commands;
mod config;
mod messages;
mod syncvar;
mod weaver;

use std::sync::Once;

pub use config::WeaveConfig;
pub use syncvar::{SyncVarProcessor, MAX_SYNC_FIELDS};
pub use weaver::{read_module, write_module, WeaveError, WeaveOutcome, WeaveStats, Weaver};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
