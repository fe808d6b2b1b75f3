use std::fmt;

use serde::Serialize;

/// Error codes for all weaver diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Reference resolution
/// - E2xxx: Codec synthesis
/// - E3xxx: Synchronized field processing
/// - E9xxx: Internal weaver errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum ErrorCode {
    // Resolution Errors (E1xxx)
    /// Referenced module missing or persistently unreadable
    E1001,
    /// Referenced module is not a valid module file
    E1002,

    // Codec Errors (E2xxx)
    /// Type is structurally ineligible for codec generation
    E2001,
    /// Type definition cannot be located
    E2002,
    /// Two codecs registered for the same type (warning)
    E2003,

    // Synchronized Field Errors (E3xxx)
    /// Too many synchronized fields on one type
    E3001,
    /// Synchronized field access could not be rewritten
    E3002,

    // Internal Errors (E9xxx)
    /// Internal weaver error
    E9001,
}

impl ErrorCode {
    /// Check if this is a resolution error (E1xxx range).
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Get the code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description for `--explain` style output.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "referenced module could not be loaded",
            ErrorCode::E1002 => "referenced module is malformed",
            ErrorCode::E2001 => "unsupported type for codec generation",
            ErrorCode::E2002 => "type could not be resolved",
            ErrorCode::E2003 => "codec registered twice for the same type",
            ErrorCode::E3001 => "too many synchronized fields",
            ErrorCode::E3002 => "synchronized field access could not be rewritten",
            ErrorCode::E9001 => "internal weaver error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E2001.as_str(), "E2001");
        assert!(ErrorCode::E1002.is_resolution_error());
        assert!(!ErrorCode::E2002.is_resolution_error());
    }
}
