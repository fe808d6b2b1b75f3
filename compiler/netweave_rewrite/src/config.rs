use netweave_ir::MethodDef;
use serde::Deserialize;

/// Which methods the rewriter leaves untouched.
///
/// Constructors are always skipped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Exact method names to skip.
    pub skip_names: Vec<String>,
    /// Method name prefixes to skip.
    pub skip_prefixes: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            skip_names: vec![
                ".cctor".to_string(),
                "SerializeSyncVars".to_string(),
                "DeserializeSyncVars".to_string(),
            ],
            skip_prefixes: vec![
                "InvokeUserCode_".to_string(),
                // Accessors touch the backing field directly.
                "get_Network".to_string(),
                "set_Network".to_string(),
            ],
        }
    }
}

impl RewriteConfig {
    pub fn skips(&self, method: &MethodDef) -> bool {
        method.is_constructor
            || self.skip_names.iter().any(|name| *name == method.name)
            || self
                .skip_prefixes
                .iter()
                .any(|prefix| method.name.starts_with(prefix.as_str()))
    }
}
