use std::io;
use std::path::PathBuf;

use netweave_diagnostic::{Diagnostic, ErrorCode};
use netweave_ir::io::ModuleFormatError;

/// A referenced module was found but could not be loaded.
///
/// Fatal for the pass: nothing further can be generated safely without it.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyLoadError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot load `{}`: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: ModuleFormatError,
    },
}

impl AssemblyLoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            AssemblyLoadError::Io { path, .. } | AssemblyLoadError::Format { path, .. } => path,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AssemblyLoadError::Io { .. } => Diagnostic::error(ErrorCode::E1001)
                .with_message(self.to_string())
                .with_note("the file may still be locked by a parallel build step"),
            AssemblyLoadError::Format { .. } => {
                Diagnostic::error(ErrorCode::E1002).with_message(self.to_string())
            }
        }
    }
}
