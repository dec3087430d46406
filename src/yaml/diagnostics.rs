//! Syntax error diagnostics for content sources

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Syntax error in a data file or frontmatter block, with source location
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error in {filename}: {message}")]
#[diagnostic(code(hestia::source::syntax))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,

    /// The underlying parser message
    message: String,
}

impl SyntaxError {
    /// Build from a serde_yml error.
    ///
    /// `line_offset` shifts the reported line when the parsed text is
    /// embedded in a larger file (frontmatter after the opening `---`).
    pub fn from_yaml(err: &serde_yml::Error, source: &str, filename: &str, line_offset: usize) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        Self::at_location(err.to_string(), source, filename, line + line_offset, column)
    }

    /// Build from a serde_json error
    pub fn from_json(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(err.to_string(), source, filename, err.line().max(1), err.column().max(1))
    }

    /// Create a syntax error at a specific 1-based line and column
    pub fn at_location(
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Convert 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (i, current) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = current
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(j, _)| j)
                .unwrap_or(current.len().saturating_sub(1));
            return line_start + within;
        }
        line_start += current.len();
    }
    source.len().saturating_sub(1)
}

/// Suggest a fix based on the parser message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs".to_string());
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once in a record".to_string());
    }

    if msg_lower.contains("expected block end") || msg_lower.contains("did not find expected") {
        return Some("Check the indentation of this record".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("Quote values that contain ':' or fix the indentation".to_string());
    }

    if msg_lower.contains("trailing comma") || msg_lower.contains("expected value") {
        return Some("Check for a missing value or a trailing comma".to_string());
    }

    None
}
