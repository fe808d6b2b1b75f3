//! Weaver configuration, loadable from JSON.

use std::path::Path;

use netweave_codec::{BaseTypeModel, CodecConfig};
use netweave_resolve::ResolverConfig;
use netweave_rewrite::RewriteConfig;
use serde::Deserialize;

use crate::WeaveError;

/// Everything a weave pass can be configured with.
///
/// Missing sections and fields take their defaults, so `{}` is a valid
/// configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub resolver: ResolverConfig,
    pub codec: CodecConfig,
    pub rewrite: RewriteConfig,
    /// Base type names deciding networked and engine-owned types.
    pub model: BaseTypeModel,
}

impl WeaveConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, WeaveError> {
        let text = std::fs::read_to_string(path).map_err(|source| WeaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| WeaveError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
