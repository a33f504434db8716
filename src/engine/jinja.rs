//! MiniJinja-backed template engine

use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{error_message, EngineError, TemplateEngine};
use crate::chain::parse_directive;

/// How rendered values are escaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Pick escaping from the template's file extension (`.html`, `.xml`, ...)
    Auto,
    /// Always escape for HTML, whatever the template is called
    #[default]
    Html,
    /// Never escape
    None,
}

/// Renders template chains with MiniJinja
///
/// Every template after the root extends the one before it, so block
/// overrides follow MiniJinja's `{% extends %}` semantics: the most specific
/// definition of a block wins.
#[derive(Debug, Clone, Default)]
pub struct JinjaEngine {
    escape: EscapeMode,
    strict_undefined: bool,
}

/// A parsed chain, ready to render
#[derive(Debug)]
pub struct JinjaChain {
    env: Environment<'static>,
    leaf: String,
}

impl JinjaChain {
    /// Name under which the leaf template was registered
    pub fn leaf_name(&self) -> &str {
        &self.leaf
    }

    /// Names of all registered templates, in no particular order
    pub fn template_names(&self) -> Vec<&str> {
        self.env.templates().map(|(name, _)| name).collect()
    }
}

impl JinjaEngine {
    /// Create an engine with HTML escaping and lenient undefined values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the escaping mode
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Fail on undefined variables instead of rendering them as empty
    pub fn with_strict_undefined(mut self, strict: bool) -> Self {
        self.strict_undefined = strict;
        self
    }

    fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        // Template text is written byte for byte, final newline included
        env.set_keep_trailing_newline(true);
        if self.strict_undefined {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        match self.escape {
            EscapeMode::Auto => {}
            EscapeMode::Html => env.set_auto_escape_callback(|_| AutoEscape::Html),
            EscapeMode::None => env.set_auto_escape_callback(|_| AutoEscape::None),
        }
        env
    }
}

impl TemplateEngine for JinjaEngine {
    type Parsed = JinjaChain;

    fn parse_all(&self, chain: &[PathBuf]) -> Result<JinjaChain, EngineError> {
        let mut env = self.environment();
        let mut parent: Option<String> = None;

        for path in chain {
            let name = template_name(path);
            let content =
                std::fs::read_to_string(path).map_err(|e| EngineError::read(path, e))?;
            let source = match &parent {
                Some(parent) => extending_source(&content, parent),
                None => content,
            };

            trace!(template = %name, extends = ?parent, "registering template");
            env.add_template_owned(name.clone(), source)
                .map_err(|e| EngineError::Parse {
                    name: name.clone(),
                    message: error_message(&e),
                })?;
            parent = Some(name);
        }

        let leaf = parent.ok_or(EngineError::EmptyChain)?;
        Ok(JinjaChain { env, leaf })
    }

    fn execute<S, W>(&self, parsed: &JinjaChain, data: &S, output: W) -> Result<(), EngineError>
    where
        S: Serialize + ?Sized,
        W: Write,
    {
        let template = parsed
            .env
            .get_template(&parsed.leaf)
            .map_err(|e| EngineError::Execute {
                name: parsed.leaf.clone(),
                message: error_message(&e),
            })?;

        template
            .render_captured_to(data, output)
            .map_err(|e| EngineError::Execute {
                name: parsed.leaf.clone(),
                message: error_message(&e),
            })?;
        Ok(())
    }
}

fn template_name(path: &Path) -> String {
    path.display().to_string()
}

/// Swap a child's directive line for an `{% extends %}` tag on `parent`
///
/// The tag is followed by a newline so line numbers in errors still match
/// the file on disk.
fn extending_source(content: &str, parent: &str) -> String {
    let first_len = content.find('\n').map_or(content.len(), |i| i + 1);
    let (first, rest) = content.split_at(first_len);
    let body = if parse_directive(first.as_bytes()).is_some() {
        rest
    } else {
        content
    };
    format!("{{% extends {} %}}\n{}", string_literal(parent), body)
}

/// Quote a template name as a MiniJinja string literal
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
