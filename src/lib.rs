//! Extends Chain - template inheritance through a first-line directive
//!
//! A template extends a parent by naming it on its first line:
//!
//! ```text
//! <!-- USE base.html -->
//! {% block title %}My page{% endblock %}
//! ```
//!
//! Rendering a template walks these directives up to the root template,
//! parses the whole chain root first and renders it, so blocks defined by a
//! child override the same blocks of its ancestors.
//!
//! # Example
//!
//! ```no_run
//! use extends_chain::render_to_string;
//!
//! let html = render_to_string("templates/page.html", &serde_json::json!({ "user": "ada" }))?;
//! println!("{html}");
//! # Ok::<(), extends_chain::RenderError>(())
//! ```

pub mod chain;
pub mod config;
pub mod engine;
pub mod lint;

pub use chain::{resolve, ChainError, ChainResolver, DIRECTIVE_PREFIX, DIRECTIVE_SUFFIX};
pub use config::{ConfigError, RenderConfig};
pub use engine::{EngineError, EscapeMode, JinjaEngine, TemplateEngine};
pub use lint::{LintCategory, LintWarning};

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while resolving the template chain
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Error while parsing or executing the resolved chain
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Render `template` with `data` into `output` using the default configuration
///
/// The chain is re-resolved and re-parsed on every call.
pub fn render<S, W>(template: impl AsRef<Path>, data: &S, output: W) -> Result<(), RenderError>
where
    S: Serialize + ?Sized,
    W: Write,
{
    render_with_config(template, data, output, &RenderConfig::default())
}

/// Render `template` into a string using the default configuration
pub fn render_to_string<S>(template: impl AsRef<Path>, data: &S) -> Result<String, RenderError>
where
    S: Serialize + ?Sized,
{
    let mut out = Vec::new();
    render(template, data, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Render `template` with a custom configuration
pub fn render_with_config<S, W>(
    template: impl AsRef<Path>,
    data: &S,
    output: W,
    config: &RenderConfig,
) -> Result<(), RenderError>
where
    S: Serialize + ?Sized,
    W: Write,
{
    render_with_engine(&config.engine(), &config.resolver(), template, data, output)
}

/// Render `template` with an explicit resolver and engine
///
/// The resolved chain is handed to [`TemplateEngine::parse_all`] root first,
/// exactly as [`ChainResolver::resolve`] returned it.
pub fn render_with_engine<E, S, W>(
    engine: &E,
    resolver: &ChainResolver,
    template: impl AsRef<Path>,
    data: &S,
    output: W,
) -> Result<(), RenderError>
where
    E: TemplateEngine,
    S: Serialize + ?Sized,
    W: Write,
{
    let chain = resolver.resolve(template)?;
    let parsed = engine.parse_all(&chain)?;
    engine.execute(&parsed, data, output)?;
    Ok(())
}

/// Render `template` and lint the root of its chain for near-miss directives
///
/// Warnings never stop the render; they are returned alongside a successful
/// result.
pub fn render_with_lint<S, W>(
    template: impl AsRef<Path>,
    data: &S,
    output: W,
    config: &RenderConfig,
) -> Result<Vec<LintWarning>, RenderError>
where
    S: Serialize + ?Sized,
    W: Write,
{
    let resolver = config.resolver();
    let engine = config.engine();

    let chain = resolver.resolve(template)?;
    let warnings = lint::check_chain(&chain)?;
    let parsed = engine.parse_all(&chain)?;
    engine.execute(&parsed, data, output)?;
    Ok(warnings)
}
