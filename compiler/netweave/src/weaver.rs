//! Pass orchestration.

use std::path::{Path, PathBuf};

use netweave_codec::{CodecSynthesizer, NetworkModel, WeaveContext};
use netweave_diagnostic::{Diagnostic, ErrorCode};
use netweave_ir::io::{decode_module, encode_module, encode_symbols, symbol_path, ModuleFormatError};
use netweave_ir::{CodecKind, ModuleDef};
use netweave_resolve::{AssemblyLoadError, AssemblyResolver};
use netweave_rewrite::{AccessRewriter, RewriteStats};

use crate::messages::generate_message_codecs;
use crate::{SyncVarProcessor, WeaveConfig};

/// Error reading or writing module and configuration files.
#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error("cannot access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{}` is not a valid module: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: ModuleFormatError,
    },
    #[error("invalid configuration in `{}`: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What a pass did, for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaveStats {
    pub writers_generated: usize,
    pub readers_generated: usize,
    pub messages: usize,
    pub sync_fields: usize,
    pub rewrite: RewriteStats,
}

/// Result of one weave pass.
#[derive(Debug)]
pub struct WeaveOutcome {
    /// The woven module; `None` when any error was recorded.
    pub module: Option<ModuleDef>,
    /// Everything reported, errors and warnings.
    pub diagnostics: Vec<Diagnostic>,
    /// The module was already woven and was returned unchanged.
    pub skipped: bool,
    pub stats: WeaveStats,
}

impl WeaveOutcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn succeeded(&self) -> bool {
        self.module.is_some()
    }
}

/// Runs weave passes with a fixed configuration.
///
/// Each pass gets a fresh resolver, registries and caches; nothing carries
/// over from one module to the next.
pub struct Weaver {
    config: WeaveConfig,
}

impl Weaver {
    pub fn new(config: WeaveConfig) -> Self {
        Weaver { config }
    }

    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    /// Weave `module`, resolving its references among `references`.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.name))]
    pub fn weave(
        &self,
        mut module: ModuleDef,
        references: Vec<PathBuf>,
        model: &dyn NetworkModel,
    ) -> WeaveOutcome {
        if module.contains_type(&self.config.codec.generated_class_name()) {
            tracing::debug!("module already woven");
            return WeaveOutcome {
                module: Some(module),
                diagnostics: Vec::new(),
                skipped: true,
                stats: WeaveStats::default(),
            };
        }

        let resolver = AssemblyResolver::new(
            module.name.as_str(),
            references,
            self.config.resolver.clone(),
        );
        let mut cx = WeaveContext::new(&mut module, &resolver, model, &self.config.codec);

        let stats = match self.run(&mut cx) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::debug!(error = %err, "pass aborted");
                return WeaveOutcome {
                    module: None,
                    diagnostics: vec![err.to_diagnostic()],
                    skipped: false,
                    stats: WeaveStats::default(),
                };
            }
        };

        let diagnostics = cx.diagnostics.flush();
        drop(cx);

        let failed = diagnostics.iter().any(Diagnostic::is_error);
        tracing::debug!(
            writers = stats.writers_generated,
            readers = stats.readers_generated,
            sync_fields = stats.sync_fields,
            rewritten = stats.rewrite.rewritten(),
            failed,
            "weave pass complete"
        );
        WeaveOutcome {
            module: (!failed).then_some(module),
            diagnostics,
            skipped: false,
            stats,
        }
    }

    fn run(&self, cx: &mut WeaveContext<'_>) -> Result<WeaveStats, AssemblyLoadError> {
        let mut writers = CodecSynthesizer::new(CodecKind::Writer);
        let mut readers = CodecSynthesizer::new(CodecKind::Reader);
        for synthesizer in [&mut writers, &mut readers] {
            synthesizer.register_builtins(cx);
            synthesizer.discover_user_codecs(cx)?;
        }

        let messages = generate_message_codecs(cx, &mut writers, &mut readers)?;

        let mut sync_vars = SyncVarProcessor::new();
        sync_vars.process_module(cx, &mut writers, &mut readers)?;
        let sync_fields = sync_vars.field_count();
        let maps = sync_vars.into_maps();

        let rewrite = AccessRewriter::new(&maps, &self.config.rewrite).rewrite_module(cx.module);
        if rewrite.locals_exhausted > 0 {
            cx.diagnostics.push(
                Diagnostic::error(ErrorCode::E3002)
                    .with_message(format!(
                        "{} synchronized field initialization(s) could not be rewritten",
                        rewrite.locals_exhausted
                    ))
                    .with_note("the enclosing method already uses every local variable index"),
            );
        }

        // Its presence is what marks the module as woven.
        cx.generated_class_mut();

        Ok(WeaveStats {
            writers_generated: writers.generated_count(),
            readers_generated: readers.generated_count(),
            messages,
            sync_fields,
            rewrite,
        })
    }

    /// Read `input`, weave it and write the result to `output`.
    ///
    /// Nothing is written when the pass fails or was skipped; the outcome
    /// carries the diagnostics either way.
    pub fn weave_file(
        &self,
        input: &Path,
        references: Vec<PathBuf>,
        output: &Path,
    ) -> Result<WeaveOutcome, WeaveError> {
        let module = read_module(input)?;
        let outcome = self.weave(module, references, &self.config.model);
        if let (Some(module), false) = (&outcome.module, outcome.skipped) {
            write_module(output, module)?;
        }
        Ok(outcome)
    }
}

/// Read a module file and its companion symbol file, if any.
pub fn read_module(path: &Path) -> Result<ModuleDef, WeaveError> {
    let io_error = |source| WeaveError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = std::fs::read(path).map_err(io_error)?;
    let symbols_path = symbol_path(path);
    let symbols = if symbols_path.is_file() {
        Some(std::fs::read(&symbols_path).map_err(|source| WeaveError::Io {
            path: symbols_path.clone(),
            source,
        })?)
    } else {
        None
    };
    decode_module(&bytes, symbols.as_deref()).map_err(|source| WeaveError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a module file, plus its symbol file when it has positions.
pub fn write_module(path: &Path, module: &ModuleDef) -> Result<(), WeaveError> {
    let format_error = |source| WeaveError::Format {
        path: path.to_path_buf(),
        source,
    };
    let bytes = encode_module(module).map_err(format_error)?;
    std::fs::write(path, bytes).map_err(|source| WeaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(symbols) = encode_symbols(module).map_err(format_error)? {
        let symbols_path = symbol_path(path);
        std::fs::write(&symbols_path, symbols).map_err(|source| WeaveError::Io {
            path: symbols_path,
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
