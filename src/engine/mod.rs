//! Template engine seam
//!
//! The chain resolver only decides which files are parsed and in which order.
//! Parsing the files together and rendering them is delegated to a
//! [`TemplateEngine`]. [`JinjaEngine`] is the default implementation.

mod jinja;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use jinja::{EscapeMode, JinjaChain, JinjaEngine};

/// Errors reported by a template engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// `parse_all` was called without any template
    #[error("cannot parse an empty template chain")]
    EmptyChain,

    /// A template file could not be loaded for parsing
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template failed to parse
    #[error("failed to parse template {name}: {message}")]
    Parse { name: String, message: String },

    /// Rendering the parsed chain failed
    #[error("failed to render template {name}: {message}")]
    Execute { name: String, message: String },
}

impl EngineError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error happened while parsing rather than executing
    pub fn is_parse(&self) -> bool {
        !matches!(self, EngineError::Execute { .. })
    }
}

/// An engine that parses a whole template chain and renders it
pub trait TemplateEngine {
    /// The parsed form of a chain
    type Parsed;

    /// Parse every template of `chain` together
    ///
    /// `chain` is ordered root first, so later entries override the blocks
    /// of earlier ones.
    fn parse_all(&self, chain: &[PathBuf]) -> Result<Self::Parsed, EngineError>;

    /// Render a parsed chain with `data` as context
    fn execute<S, W>(&self, parsed: &Self::Parsed, data: &S, output: W) -> Result<(), EngineError>
    where
        S: Serialize + ?Sized,
        W: Write;
}

/// Join an error with its chain of sources
pub(crate) fn error_message(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut err = err;
    while let Some(next_err) = err.source() {
        message.push_str("\nCaused by: ");
        message.push_str(&next_err.to_string());
        err = next_err;
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] io::Error);

    #[test]
    fn test_error_message_includes_sources() {
        let err = Outer(io::Error::new(io::ErrorKind::Other, "inner"));
        assert_eq!(error_message(&err), "outer\nCaused by: inner");
    }

    #[test]
    fn test_parse_and_execute_classification() {
        assert!(EngineError::EmptyChain.is_parse());
        assert!(EngineError::Parse {
            name: "a".into(),
            message: "bad".into()
        }
        .is_parse());
        assert!(!EngineError::Execute {
            name: "a".into(),
            message: "bad".into()
        }
        .is_parse());
    }
}
