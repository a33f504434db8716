//! Template inheritance chains
//!
//! A template can extend a parent by naming it on its very first line:
//!
//! ```text
//! <!-- USE layouts/base.html -->
//! {% block body %}...{% endblock %}
//! ```
//!
//! This module follows those directives from a leaf template up to the root
//! ancestor and returns the files root-first, ready to be handed to a
//! [`TemplateEngine`](crate::engine::TemplateEngine).

mod directive;
mod error;
mod resolver;

pub use directive::{parse_directive, DIRECTIVE_PREFIX, DIRECTIVE_SUFFIX};
pub use error::ChainError;
pub use resolver::{resolve, ChainResolver};

pub(crate) use resolver::read_first_line;
