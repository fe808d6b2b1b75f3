//! The resolver and its pass-scoped cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use netweave_ir::io::{decode_module, symbol_path, MODULE_EXTENSIONS};
use netweave_ir::ModuleDef;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::AssemblyLoadError;

/// Read-retry policy for module files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Retries after the first failed read.
    pub retry_count: u32,
    /// Fixed wait between attempts, in milliseconds.
    pub retry_wait_ms: u64,
}

impl ResolverConfig {
    pub fn retry_wait(&self) -> Duration {
        Duration::from_millis(self.retry_wait_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            retry_count: 10,
            retry_wait_ms: 1000,
        }
    }
}

/// Outcome of a successful lookup.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// The module under weave. Callers already hold it.
    Current,
    /// A referenced module loaded from disk.
    External(Arc<ModuleDef>),
}

/// Canonical file path plus modification time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl CacheKey {
    fn for_file(path: &Path) -> Result<CacheKey, AssemblyLoadError> {
        let io_err = |source| AssemblyLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_err)?;
        let modified = fs::metadata(&canonical)
            .and_then(|meta| meta.modified())
            .map_err(io_err)?;
        Ok(CacheKey {
            path: canonical,
            modified,
        })
    }
}

/// Resolves module names against the declared reference paths.
pub struct AssemblyResolver {
    self_name: String,
    references: Vec<PathBuf>,
    config: ResolverConfig,
    cache: Mutex<FxHashMap<CacheKey, Arc<ModuleDef>>>,
}

impl AssemblyResolver {
    pub fn new(
        self_name: impl Into<String>,
        references: Vec<PathBuf>,
        config: ResolverConfig,
    ) -> Self {
        AssemblyResolver {
            self_name: self_name.into(),
            references,
            config,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Name of the module under weave.
    pub fn self_name(&self) -> &str {
        &self.self_name
    }

    pub fn references(&self) -> &[PathBuf] {
        &self.references
    }

    /// Number of distinct module versions loaded so far.
    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }

    /// Resolve a module by name.
    ///
    /// Returns `Ok(None)` when no file matches; absence is the caller's call.
    /// A loaded module's own references are plain names, resolved through
    /// this same resolver when something asks for them.
    pub fn resolve(&self, name: &str) -> Result<Option<Resolved>, AssemblyLoadError> {
        if name == self.self_name {
            return Ok(Some(Resolved::Current));
        }

        // Find, key, check and insert as one critical section.
        let mut cache = self.cache.lock();

        let Some(path) = self.find_file(name) else {
            tracing::debug!(module = name, "reference not found");
            return Ok(None);
        };

        let key = CacheKey::for_file(&path)?;
        if let Some(module) = cache.get(&key) {
            return Ok(Some(Resolved::External(Arc::clone(module))));
        }

        let module = Arc::new(self.load(&path)?);
        tracing::debug!(
            module = name,
            path = %key.path.display(),
            types = module.types.len(),
            "loaded reference"
        );
        cache.insert(key, Arc::clone(&module));
        Ok(Some(Resolved::External(module)))
    }

    /// Locate the file for `name`: direct references by file name first,
    /// then every distinct reference directory.
    fn find_file(&self, name: &str) -> Option<PathBuf> {
        let candidates: Vec<String> = MODULE_EXTENSIONS
            .iter()
            .map(|ext| format!("{name}.{ext}"))
            .collect();

        let direct = self.references.iter().find(|reference| {
            reference
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| candidates.iter().any(|c| c == f))
        });
        if let Some(found) = direct {
            return Some(found.clone());
        }

        let mut seen = FxHashSet::default();
        for dir in self.references.iter().filter_map(|r| r.parent()) {
            if !seen.insert(dir) {
                continue;
            }
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }

    fn load(&self, path: &Path) -> Result<ModuleDef, AssemblyLoadError> {
        let bytes = self.read_with_retry(path)?;

        let pdb = symbol_path(path);
        let symbols = if pdb.is_file() {
            Some(self.read_with_retry(&pdb)?)
        } else {
            None
        };

        decode_module(&bytes, symbols.as_deref()).map_err(|source| AssemblyLoadError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a whole file, retrying I/O failures with a fixed wait.
    ///
    /// Another build step may still be flushing the file.
    fn read_with_retry(&self, path: &Path) -> Result<Vec<u8>, AssemblyLoadError> {
        let mut remaining = self.config.retry_count;
        loop {
            match read_fully(path) {
                Ok(bytes) => return Ok(bytes),
                Err(source) if remaining == 0 => {
                    return Err(AssemblyLoadError::Io {
                        path: path.to_path_buf(),
                        source,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        remaining,
                        "read failed, retrying"
                    );
                    remaining -= 1;
                    thread::sleep(self.config.retry_wait());
                }
            }
        }
    }
}

fn read_fully(path: &Path) -> io::Result<Vec<u8>> {
    let expected = fs::metadata(path)?.len();
    let bytes = fs::read(path)?;
    if bytes.len() as u64 != expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "file changed size while reading",
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests;
