use std::fmt;

use netweave_diagnostic::{Diagnostic, ErrorCode};
use netweave_ir::{CodecKind, SequencePoint, TypeRef};
use netweave_resolve::AssemblyLoadError;

/// Why a type is structurally ineligible for a generated codec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedReason {
    ByReference,
    MultidimensionalArray,
    /// Engine component, object or asset type; no byte form outside a live engine.
    EngineOwned,
    /// Open generic definition, not a closed instance.
    GenericType,
    Interface,
    AbstractClass,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnsupportedReason::ByReference => "passed by reference",
            UnsupportedReason::MultidimensionalArray => "multidimensional array",
            UnsupportedReason::EngineOwned => "engine-owned type",
            UnsupportedReason::GenericType => "generic type",
            UnsupportedReason::Interface => "interface",
            UnsupportedReason::AbstractClass => "abstract class",
        };
        f.write_str(text)
    }
}

/// Failure to find or generate a codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Cannot generate {kind} for {ty}: {reason} is not supported")]
    Unsupported {
        kind: CodecKind,
        ty: TypeRef,
        reason: UnsupportedReason,
        position: Option<SequencePoint>,
    },
    #[error("Cannot generate {kind} for {ty}: type could not be resolved")]
    Unresolved {
        kind: CodecKind,
        ty: TypeRef,
        position: Option<SequencePoint>,
    },
    #[error(transparent)]
    Load(#[from] AssemblyLoadError),
}

impl CodecError {
    /// The type the failure is about.
    pub fn ty(&self) -> Option<&TypeRef> {
        match self {
            CodecError::Unsupported { ty, .. } | CodecError::Unresolved { ty, .. } => Some(ty),
            CodecError::Load(_) => None,
        }
    }

    /// Where the offending type is declared, when known.
    pub fn position(&self) -> Option<&SequencePoint> {
        match self {
            CodecError::Unsupported { position, .. } | CodecError::Unresolved { position, .. } => {
                position.as_ref()
            }
            CodecError::Load(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CodecError::Unsupported { kind, .. } => Diagnostic::error(ErrorCode::E2001)
                .with_message(self.to_string())
                .with_position(self.position().cloned())
                .with_suggestion(format!("use a supported type or provide a custom {kind}")),
            CodecError::Unresolved { ty, .. } => Diagnostic::error(ErrorCode::E2002)
                .with_message(self.to_string())
                .with_position(self.position().cloned())
                .with_suggestion(match ty.scope() {
                    Some(scope) => format!("add a reference to `{scope}`"),
                    None => "add a reference to the module declaring the type".to_string(),
                }),
            CodecError::Load(err) => err.to_diagnostic(),
        }
    }
}
