//! Lint for near-miss extends directives
//!
//! Resolution is deliberately strict: a first line that is almost, but not
//! exactly, `<!-- USE parent -->` is treated as ordinary content and ends the
//! chain. That is easy to miss, so this lint looks at the root of a resolved
//! chain (the only template whose first line did not match) and reports
//! lines that look like a directive.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::chain::{parse_directive, read_first_line, ChainError, DIRECTIVE_PREFIX};

const BYTE_ORDER_MARK: char = '\u{feff}';
const CLOSING: &str = " -->";

/// A lint warning about a template's first line
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    /// Template the line was read from
    pub path: PathBuf,
    /// The first line, without its terminator
    pub line: String,
    /// Character range of the offending part of `line`
    pub span: Range<usize>,
    pub message: String,
}

/// Category of near-miss directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    /// Characters after the closing ` -->`
    TrailingCharacters,
    /// Line ends with `\r\n` instead of `\n`
    CarriageReturn,
    /// Directive is the whole file, with no line terminator
    MissingTerminator,
    /// Line starts with a byte-order mark
    ByteOrderMark,
    /// Whitespace before `<!--`
    LeadingWhitespace,
    /// Directive is never closed with ` -->`
    Unclosed,
    /// `<!-- USE -->` with no room for a parent between prefix and suffix
    MissingParent,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::TrailingCharacters => write!(f, "trailing-characters"),
            LintCategory::CarriageReturn => write!(f, "carriage-return"),
            LintCategory::MissingTerminator => write!(f, "missing-terminator"),
            LintCategory::ByteOrderMark => write!(f, "byte-order-mark"),
            LintCategory::LeadingWhitespace => write!(f, "leading-whitespace"),
            LintCategory::Unclosed => write!(f, "unclosed"),
            LintCategory::MissingParent => write!(f, "missing-parent"),
        }
    }
}

impl LintWarning {
    /// Format the warning with the offending line using ariadne
    pub fn report(&self) -> String {
        let filename = self.path.display().to_string();
        let filename = filename.as_str();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(format!("ignored as {}", self.category))
                    .with_color(Color::Yellow),
            )
            .with_note(
                "the directive must be exactly `<!-- USE <parent> -->` followed by a newline",
            )
            .finish()
            .write((filename, Source::from(self.line.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.message.clone(),
        }
    }
}

/// Lint the root of a resolved chain
///
/// Every other template in the chain matched the directive exactly, so only
/// the root can hold a near-miss.
pub fn check_chain(chain: &[PathBuf]) -> Result<Vec<LintWarning>, ChainError> {
    let Some(root) = chain.first() else {
        return Ok(Vec::new());
    };
    let line = read_first_line(root)?;
    Ok(check_line(root, &line).into_iter().collect())
}

/// Check a raw first line (terminator included) for a near-miss directive
pub fn check_line(path: &Path, raw: &[u8]) -> Option<LintWarning> {
    if parse_directive(raw).is_some() {
        return None;
    }

    let text = String::from_utf8_lossy(raw);
    let (line, terminator) = split_terminator(&text);
    let warning = |category, span: Range<usize>, message: String| LintWarning {
        category,
        path: path.to_path_buf(),
        line: line.to_string(),
        span,
        message,
    };

    let trimmed = line.trim_start();
    let lead = char_len(&line[..line.len() - trimmed.len()]);
    if let Some(rest) = trimmed.strip_prefix(BYTE_ORDER_MARK) {
        if rest.starts_with(DIRECTIVE_PREFIX) {
            return Some(warning(
                LintCategory::ByteOrderMark,
                lead..lead + 1,
                "directive is preceded by a byte-order mark".to_string(),
            ));
        }
    }
    if !trimmed.starts_with(DIRECTIVE_PREFIX) {
        return None;
    }
    if lead > 0 {
        return Some(warning(
            LintCategory::LeadingWhitespace,
            0..lead,
            "directive is preceded by whitespace".to_string(),
        ));
    }

    let total = char_len(line);
    let Some(close) = line.find(CLOSING) else {
        return Some(warning(
            LintCategory::Unclosed,
            0..total,
            format!("directive is not closed with `{}`", CLOSING.trim_start()),
        ));
    };
    let close_end = char_len(&line[..close + CLOSING.len()]);

    // The closing space is the prefix's own trailing space
    if close < DIRECTIVE_PREFIX.len() {
        return Some(warning(
            LintCategory::MissingParent,
            0..close_end,
            "directive does not name a parent template".to_string(),
        ));
    }

    if close_end < total {
        return Some(warning(
            LintCategory::TrailingCharacters,
            close_end..total,
            "unexpected characters after the directive".to_string(),
        ));
    }
    match terminator {
        "\r\n" => Some(warning(
            LintCategory::CarriageReturn,
            0..total,
            "directive line ends with \\r\\n".to_string(),
        )),
        "" => Some(warning(
            LintCategory::MissingTerminator,
            0..total,
            "directive is not followed by a newline".to_string(),
        )),
        // A bare `\n` with an exact close would have matched
        _ => None,
    }
}

fn split_terminator(text: &str) -> (&str, &str) {
    if let Some(line) = text.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = text.strip_suffix('\n') {
        (line, "\n")
    } else {
        (text, "")
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
