//! Chain resolution - follows extends directives from a leaf up to its root

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::directive::parse_directive;
use super::error::ChainError;

/// Resolve the chain of `leaf` with the default resolver
///
/// See [`ChainResolver::resolve`].
pub fn resolve(leaf: impl AsRef<Path>) -> Result<Vec<PathBuf>, ChainError> {
    ChainResolver::new().resolve(leaf)
}

/// Walks `<!-- USE parent -->` directives to build a template chain
///
/// The resolver holds no state between calls: every [`resolve`](Self::resolve)
/// re-opens every template in the chain.
#[derive(Debug, Clone, Default)]
pub struct ChainResolver {
    /// Base path for resolving relative identifiers
    base_path: Option<PathBuf>,
    /// Fail on a directive that revisits a template instead of looping forever
    detect_cycles: bool,
}

impl ChainResolver {
    /// Create a resolver using the host's path semantics and no cycle guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against `base_path`
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Enable or disable cycle detection
    ///
    /// Without it a directive cycle (`a -> b -> a`) never terminates.
    pub fn with_cycle_detection(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// Get the base path for identifier resolution
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    /// Whether cycle detection is enabled
    pub fn detects_cycles(&self) -> bool {
        self.detect_cycles
    }

    /// Resolve an identifier to the path that is actually opened
    pub fn locate(&self, identifier: impl AsRef<Path>) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(identifier),
            None => identifier.as_ref().to_path_buf(),
        }
    }

    /// Build the chain of templates that `leaf` extends, root first
    ///
    /// The returned chain always ends with `leaf` (as located by
    /// [`locate`](Self::locate)). Any failure aborts the walk; no partial
    /// chain is returned.
    pub fn resolve(&self, leaf: impl AsRef<Path>) -> Result<Vec<PathBuf>, ChainError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.locate(leaf);

        loop {
            if self.detect_cycles && !seen.insert(current.clone()) {
                chain.push(current.clone());
                return Err(ChainError::Cycle {
                    path: current,
                    chain,
                });
            }
            chain.push(current.clone());

            let line = read_first_line(&current)?;
            let parent = match parse_directive(&line) {
                Some(Ok(parent)) => parent,
                Some(Err(e)) => {
                    return Err(ChainError::Read {
                        path: current,
                        source: io::Error::new(io::ErrorKind::InvalidData, e),
                    })
                }
                None => break,
            };

            debug!(template = %current.display(), parent, "template extends parent");
            current = self.locate(parent);
        }

        chain.reverse();
        debug!(depth = chain.len(), root = %chain[0].display(), "resolved template chain");
        Ok(chain)
    }
}

/// Read the raw first line of a template, terminator included
///
/// The file is closed before returning. An empty file yields an empty line.
pub(crate) fn read_first_line(path: &Path) -> Result<Vec<u8>, ChainError> {
    let file = File::open(path).map_err(|source| ChainError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    reader
        .read_until(b'\n', &mut line)
        .map_err(|source| ChainError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(line)
}
