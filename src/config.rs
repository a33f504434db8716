//! Render configuration
//!
//! A [`RenderConfig`] can be built in code or loaded from TOML:
//!
//! ```toml
//! base_path = "templates"
//! detect_cycles = true
//! escape = "html"
//! strict_undefined = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::chain::ChainResolver;
use crate::engine::{EscapeMode, JinjaEngine};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Directory that relative template identifiers are resolved against
    pub base_path: Option<PathBuf>,
    /// Fail on directive cycles instead of following them forever
    pub detect_cycles: bool,
    /// Escaping applied to rendered values
    pub escape: EscapeMode,
    /// Fail on undefined template variables
    pub strict_undefined: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the base path for relative identifiers
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Enable or disable directive cycle detection
    pub fn with_cycle_detection(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    /// Set the escaping mode
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Enable or disable strict undefined variables
    pub fn with_strict_undefined(mut self, strict: bool) -> Self {
        self.strict_undefined = strict;
        self
    }

    /// Build the chain resolver described by this configuration
    pub fn resolver(&self) -> ChainResolver {
        let resolver = ChainResolver::new().with_cycle_detection(self.detect_cycles);
        match &self.base_path {
            Some(base) => resolver.with_base_path(base),
            None => resolver,
        }
    }

    /// Build the template engine described by this configuration
    pub fn engine(&self) -> JinjaEngine {
        JinjaEngine::new()
            .with_escape(self.escape)
            .with_strict_undefined(self.strict_undefined)
    }
}
