//! The `<!-- USE parent -->` first-line directive

/// Literal text that opens an extends directive
pub const DIRECTIVE_PREFIX: &str = "<!-- USE ";

/// Literal text that closes an extends directive, including the line terminator
pub const DIRECTIVE_SUFFIX: &str = " -->\n";

/// Extract the parent identifier from a template's first line.
///
/// `line` is the raw first line, including its `\n` terminator when the file
/// has one. Only an exact `prefix + parent + suffix` match counts; anything
/// else (stray trailing characters, `\r\n`, no terminator at all) means the
/// template has no parent. The parent is returned verbatim, whitespace
/// included.
///
/// Returns `Some(Err(_))` when the line is a directive whose parent is not
/// valid UTF-8.
pub fn parse_directive(line: &[u8]) -> Option<Result<&str, std::str::Utf8Error>> {
    let parent = line
        .strip_prefix(DIRECTIVE_PREFIX.as_bytes())?
        .strip_suffix(DIRECTIVE_SUFFIX.as_bytes())?;
    Some(std::str::from_utf8(parent))
}
