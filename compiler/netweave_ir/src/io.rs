//! Module and symbol file format.
//!
//! ```text
//! module file:  b"NWMD" | version: u16 (LE) | bincode(ModuleDef)
//! symbol file:  bincode(SymbolTable), stored at `<module file>.pdb`
//! ```

use std::path::{Path, PathBuf};

use crate::{ModuleDef, SymbolTable};

/// Leading bytes of every module file.
pub const MAGIC: [u8; 4] = *b"NWMD";

/// Current module format version.
pub const FORMAT_VERSION: u16 = 1;

/// Extensions a module file may carry.
pub const MODULE_EXTENSIONS: [&str; 2] = ["dll", "exe"];

/// Error decoding or encoding a module or symbol file.
#[derive(Debug, thiserror::Error)]
pub enum ModuleFormatError {
    #[error("file is too short to hold a module header")]
    Truncated,
    #[error("not a module file (bad magic)")]
    BadMagic,
    #[error("unsupported module format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("malformed payload: {0}")]
    Payload(#[from] bincode::Error),
}

/// Decode a module, applying the companion symbols when present.
pub fn decode_module(bytes: &[u8], symbols: Option<&[u8]>) -> Result<ModuleDef, ModuleFormatError> {
    let header_len = MAGIC.len() + 2;
    if bytes.len() < header_len {
        return Err(ModuleFormatError::Truncated);
    }
    if bytes[..MAGIC.len()] != MAGIC {
        return Err(ModuleFormatError::BadMagic);
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(ModuleFormatError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let mut module: ModuleDef = bincode::deserialize(&bytes[header_len..])?;
    if let Some(symbols) = symbols {
        let table: SymbolTable = bincode::deserialize(symbols)?;
        module.apply_symbols(&table);
    }
    Ok(module)
}

/// Encode a module (without positions; see [`encode_symbols`]).
pub fn encode_module(module: &ModuleDef) -> Result<Vec<u8>, ModuleFormatError> {
    let payload = bincode::serialize(module)?;
    let mut bytes = Vec::with_capacity(MAGIC.len() + 2 + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Encode the module's sequence points, or `None` if it has none.
pub fn encode_symbols(module: &ModuleDef) -> Result<Option<Vec<u8>>, ModuleFormatError> {
    let table = module.collect_symbols();
    if table.is_empty() {
        return Ok(None);
    }
    Ok(Some(bincode::serialize(&table)?))
}

/// Path of the symbol file belonging to a module file.
pub fn symbol_path(module_path: &Path) -> PathBuf {
    let mut os = module_path.as_os_str().to_owned();
    os.push(".pdb");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests;
