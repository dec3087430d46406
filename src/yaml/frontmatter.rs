//! Frontmatter splitting for documentation files

use serde_json::{Map, Value as JsonValue};

use crate::yaml::diagnostics::SyntaxError;

const DELIMITER: &str = "---";

/// A documentation file split into its frontmatter and body
#[derive(Debug, Clone, PartialEq)]
pub struct Split<'a> {
    /// Raw YAML between the delimiters (empty when the file has none)
    pub frontmatter: &'a str,
    /// Byte offset of the frontmatter text in the file
    pub offset: usize,
    /// Number of lines before the frontmatter text starts
    pub line_offset: usize,
    pub body: &'a str,
}

/// Split `content` at the `---` delimiters.
///
/// The opening delimiter must be the first line. A file without one is all
/// body; an unterminated block is treated the same way.
pub fn split(content: &str) -> Split<'_> {
    let no_frontmatter = Split {
        frontmatter: "",
        offset: 0,
        line_offset: 0,
        body: content,
    };

    let rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let bom = content.len() - rest.len();
    let Some(first_line_end) = rest.find('\n') else {
        return no_frontmatter;
    };
    if rest[..first_line_end].trim_end() != DELIMITER {
        return no_frontmatter;
    }

    let after_open = &rest[first_line_end + 1..];
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let frontmatter = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Split {
                frontmatter,
                offset: bom + first_line_end + 1,
                line_offset: 1,
                body: body.trim_start_matches(['\r', '\n']),
            };
        }
        offset += line.len();
    }

    no_frontmatter
}

/// Parse the frontmatter of `content` into a JSON mapping plus the body.
///
/// Blank frontmatter yields an empty mapping. Anything other than a mapping
/// is returned as-is so the schema can report it.
pub fn parse(content: &str, filename: &str) -> Result<(JsonValue, String), SyntaxError> {
    let parts = split(content);

    if parts.frontmatter.trim().is_empty() {
        return Ok((JsonValue::Object(Map::new()), parts.body.to_string()));
    }

    let yaml: serde_yml::Value = serde_yml::from_str(parts.frontmatter)
        .map_err(|e| SyntaxError::from_yaml(&e, content, filename, parts.line_offset))?;

    let value = serde_json::to_value(&yaml).map_err(|e| {
        SyntaxError::at_location(
            format!("frontmatter cannot be represented as data: {}", e),
            content,
            filename,
            1 + parts.line_offset,
            1,
        )
    })?;

    Ok((value, parts.body.to_string()))
}
