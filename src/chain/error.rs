//! Errors raised while walking a template chain

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while resolving a template chain
#[derive(Debug, Error)]
pub enum ChainError {
    /// A template in the chain could not be opened
    #[error("failed to open template {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The first line of an opened template could not be read
    #[error("error reading first line of template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directive refers back to a template already in the chain
    #[error("template inheritance cycle: {}", format_chain(chain))]
    Cycle { path: PathBuf, chain: Vec<PathBuf> },
}

impl ChainError {
    /// The template the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ChainError::Open { path, .. }
            | ChainError::Read { path, .. }
            | ChainError::Cycle { path, .. } => path,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = ChainError::Cycle {
            path: "a.html".into(),
            chain: vec!["a.html".into(), "b.html".into(), "a.html".into()],
        };
        assert_eq!(
            err.to_string(),
            "template inheritance cycle: a.html -> b.html -> a.html"
        );
        assert_eq!(err.path(), Path::new("a.html"));
    }

    #[test]
    fn test_open_message_names_path() {
        let err = ChainError::Open {
            path: "missing.html".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to open template missing.html: not found"
        );
    }
}
