//! Content loaders
//!
//! A loader turns an external source into a finite list of raw, untyped
//! records. Every call re-reads the source; nothing is cached between calls.

use miette::Diagnostic;
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

use crate::yaml::{frontmatter, SyntaxError};

/// Extensions picked up by [`DocsLoader`]
pub const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "mdoc"];

/// The source of a collection could not be read or has the wrong shape
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    #[diagnostic(
        code(hestia::source::unavailable),
        help("check that the path exists and is readable")
    )]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("unexpected data shape in {}: {message}", path.display())]
    #[diagnostic(
        code(hestia::source::shape),
        help("a data file must hold a list of records or a mapping of key to record")
    )]
    Shape { path: PathBuf, message: String },
}

impl SourceError {
    fn unavailable(path: &Path, source: std::io::Error) -> Self {
        SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where a record sits in its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocator {
    /// Zero-based position in the loader's output
    pub index: usize,
    /// Key taken from the source (the `id` field, map key or doc slug)
    pub key: Option<String>,
}

impl fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "id={} (record #{})", key, self.index + 1),
            None => write!(f, "record #{}", self.index + 1),
        }
    }
}

/// Text a record was read from, used to point diagnostics at it
#[derive(Debug, Clone)]
pub struct RecordOrigin {
    pub path: PathBuf,
    pub text: Arc<String>,
    /// Byte offset and length of the record inside `text`
    pub span: Option<(usize, usize)>,
}

impl RecordOrigin {
    /// The slice of the source holding this record
    pub fn record_text(&self) -> &str {
        match self.span {
            Some((offset, len)) => self.text.get(offset..offset + len).unwrap_or(""),
            None => self.text.as_str(),
        }
    }

    /// Offset of [`record_text`](Self::record_text) inside the full source
    pub fn record_offset(&self) -> usize {
        self.span.map(|(offset, _)| offset).unwrap_or(0)
    }
}

/// One untyped record as produced by a loader
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub locator: RecordLocator,
    pub data: JsonValue,
    /// Document body for file-tree sources
    pub body: Option<String>,
    pub origin: Option<RecordOrigin>,
}

impl RawRecord {
    /// A record with no origin, keyed by its `id` field when present
    pub fn new(index: usize, data: JsonValue) -> Self {
        let key = data.get("id").and_then(key_string);
        Self {
            locator: RecordLocator { index, key },
            data,
            body: None,
            origin: None,
        }
    }
}

/// Produces raw records from an external source
pub trait Loader: Send + Sync {
    /// Read the source to completion
    fn load(&self) -> Result<Vec<RawRecord>, SourceError>;

    /// Short human-readable description of the source
    fn describe(&self) -> String;
}

/// Loads records from a single YAML or JSON data file.
///
/// The file holds either a list of records or a mapping of key to record.
/// Mapping keys are injected as `id` into records that lack one.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path.extension().is_some_and(|e| e == "json")
    }
}

impl Loader for FileLoader {
    fn load(&self) -> Result<Vec<RawRecord>, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|e| SourceError::unavailable(&self.path, e))?;
        let filename = self.path.display().to_string();

        let root: serde_yml::Value = if self.is_json() {
            serde_json::from_str(&text).map_err(|e| SyntaxError::from_json(&e, &text, &filename))?
        } else {
            serde_yml::from_str(&text).map_err(|e| SyntaxError::from_yaml(&e, &text, &filename, 0))?
        };

        let text = Arc::new(text);
        let records = match root {
            serde_yml::Value::Null => Vec::new(),
            serde_yml::Value::Sequence(items) => self.from_sequence(items, &text)?,
            serde_yml::Value::Mapping(entries) => self.from_mapping(entries, &text)?,
            other => {
                return Err(SourceError::Shape {
                    path: self.path.clone(),
                    message: format!("top level is a {}", yaml_kind(&other)),
                })
            }
        };

        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded data file");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file({})", self.path.display())
    }
}

impl FileLoader {
    fn from_sequence(&self, items: Vec<serde_yml::Value>, text: &Arc<String>) -> Result<Vec<RawRecord>, SourceError> {
        let spans = if self.is_json() {
            None
        } else {
            top_level_spans(text, items.len(), |line| line == "-" || line.starts_with("- "))
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let data = self.to_json(&item)?;
                let mut record = RawRecord::new(index, data);
                record.origin = Some(self.origin(text, spans.as_ref().map(|s| s[index])));
                Ok(record)
            })
            .collect()
    }

    fn from_mapping(&self, entries: serde_yml::Mapping, text: &Arc<String>) -> Result<Vec<RawRecord>, SourceError> {
        let spans = if self.is_json() {
            None
        } else {
            top_level_spans(text, entries.len(), |line| {
                !line.starts_with(['#', ' ', '\t', '-']) && line.contains(':')
            })
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(index, (key, item))| {
                let key = match &key {
                    serde_yml::Value::String(s) => s.clone(),
                    serde_yml::Value::Number(n) => n.to_string(),
                    other => {
                        return Err(SourceError::Shape {
                            path: self.path.clone(),
                            message: format!("record key is a {}", yaml_kind(other)),
                        })
                    }
                };

                let mut data = self.to_json(&item)?;
                if let JsonValue::Object(map) = &mut data {
                    map.entry("id").or_insert_with(|| JsonValue::String(key.clone()));
                }

                Ok(RawRecord {
                    locator: RecordLocator {
                        index,
                        key: Some(key),
                    },
                    data,
                    body: None,
                    origin: Some(self.origin(text, spans.as_ref().map(|s| s[index]))),
                })
            })
            .collect()
    }

    fn to_json(&self, value: &serde_yml::Value) -> Result<JsonValue, SourceError> {
        serde_json::to_value(value).map_err(|e| SourceError::Shape {
            path: self.path.clone(),
            message: format!("record cannot be represented as data: {}", e),
        })
    }

    fn origin(&self, text: &Arc<String>, span: Option<(usize, usize)>) -> RecordOrigin {
        RecordOrigin {
            path: self.path.clone(),
            text: Arc::clone(text),
            span,
        }
    }
}

/// Loads documentation pages from a directory tree.
///
/// Every `.md`, `.mdx` or `.mdoc` file whose name does not start with `_`
/// becomes one record: its frontmatter is the record data and the rest of
/// the file is the body. Files are visited in sorted path order.
#[derive(Debug, Clone)]
pub struct DocsLoader {
    dir: PathBuf,
}

impl DocsLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Loader for DocsLoader {
    fn load(&self) -> Result<Vec<RawRecord>, SourceError> {
        if !self.dir.is_dir() {
            return Err(SourceError::unavailable(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "docs directory not found"),
            ));
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                SourceError::Unavailable {
                    path,
                    source: e.into(),
                }
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_doc_file(path) {
                continue;
            }

            let text = fs::read_to_string(path).map_err(|e| SourceError::unavailable(path, e))?;
            let relative = path.strip_prefix(&self.dir).unwrap_or(path);
            let (data, body) = frontmatter::parse(&text, &path.display().to_string())?;

            let id = data
                .get("slug")
                .and_then(JsonValue::as_str)
                .map(|s| s.trim_matches('/').to_string())
                .unwrap_or_else(|| slug_from_path(relative));

            let parts = frontmatter::split(&text);
            let span = (!parts.frontmatter.is_empty()).then_some((parts.offset, parts.frontmatter.len()));

            tracing::trace!(path = %path.display(), id = %id, "loaded doc page");
            records.push(RawRecord {
                locator: RecordLocator {
                    index: records.len(),
                    key: Some(id),
                },
                data,
                body: Some(body),
                origin: Some(RecordOrigin {
                    path: path.to_path_buf(),
                    text: Arc::new(text),
                    span,
                }),
            });
        }

        tracing::debug!(dir = %self.dir.display(), records = records.len(), "loaded docs tree");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("docs({})", self.dir.display())
    }
}

/// Serves a fixed set of records
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    records: Vec<JsonValue>,
}

impl MemoryLoader {
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self { records }
    }
}

impl Loader for MemoryLoader {
    fn load(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(index, data)| RawRecord::new(index, data.clone()))
            .collect())
    }

    fn describe(&self) -> String {
        format!("memory({} records)", self.records.len())
    }
}

fn is_doc_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DOC_EXTENSIONS.contains(&e));
    known && !hidden
}

/// Derive an entry id from a path relative to the docs root.
///
/// Segments are lowercased, whitespace becomes `-` and punctuation is
/// dropped. A trailing `index` segment is removed unless it is the only one.
pub fn slug_from_path(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    segments.join("/")
}

fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Render an `id`-like value as a record key
fn key_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &serde_yml::Value) -> &'static str {
    match value {
        serde_yml::Value::Null => "null",
        serde_yml::Value::Bool(_) => "boolean",
        serde_yml::Value::Number(_) => "number",
        serde_yml::Value::String(_) => "string",
        serde_yml::Value::Sequence(_) => "sequence",
        serde_yml::Value::Mapping(_) => "mapping",
        serde_yml::Value::Tagged(_) => "tagged value",
    }
}

/// Byte spans of the top-level records in a block-style YAML file.
///
/// A record starts at an unindented line accepted by `starts_record` and
/// runs until the next one. Returns `None` when the count does not match
/// (flow style, anchors, odd layouts) so callers fall back to the whole file.
fn top_level_spans(text: &str, expected: usize, starts_record: impl Fn(&str) -> bool) -> Option<Vec<(usize, usize)>> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if starts_record(line.trim_end()) {
            starts.push(offset);
        }
        offset += line.len();
    }

    if starts.len() != expected {
        return None;
    }

    let spans = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            (start, end - start)
        })
        .collect();
    Some(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    const COMMENTS: &str = "\
- id: 1
  name: Ann
  login: ann
  body: Great tool
  avatar: https://x.test/a.png
  href: https://x.test/ann
- id: 2
  name: Bob
  login: bob
  body: Nice
  avatar: https://x.test/b.png
  href: https://x.test/bob
";

    #[test]
    fn test_file_loader_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.yaml");
        fs::write(&path, COMMENTS).unwrap();

        let records = FileLoader::new(&path).load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].locator.key.as_deref(), Some("1"));
        assert_eq!(records[1].data["login"], "bob");

        let origin = records[1].origin.as_ref().unwrap();
        assert!(origin.record_text().starts_with("- id: 2"));
    }

    #[test]
    fn test_file_loader_mapping_injects_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.yaml");
        fs::write(&path, "ann:\n  name: Ann\nbob:\n  name: Bob\n  id: 7\n").unwrap();

        let records = FileLoader::new(&path).load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data["id"], "ann");
        assert_eq!(records[1].data["id"], 7);
        assert_eq!(records[1].locator.key.as_deref(), Some("bob"));
        assert!(records[1].origin.as_ref().unwrap().record_text().starts_with("bob:"));
    }

    #[test]
    fn test_file_loader_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.json");
        fs::write(&path, r#"[{"id": 3, "name": "Cy"}]"#).unwrap();

        let records = FileLoader::new(&path).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].locator.key.as_deref(), Some("3"));
        assert!(records[0].origin.as_ref().unwrap().span.is_none());
    }

    #[test]
    fn test_file_loader_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.yaml");
        fs::write(&path, "").unwrap();

        assert!(FileLoader::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_file_loader_missing_file() {
        let err = FileLoader::new("/nonexistent/comments.yaml").load().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn test_file_loader_scalar_top_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.yaml");
        fs::write(&path, "just a string\n").unwrap();

        let err = FileLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, SourceError::Shape { .. }));
    }

    #[test]
    fn test_file_loader_syntax_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comments.yaml");
        fs::write(&path, "- id: 1\n  name: [Ann\n").unwrap();

        let err = FileLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, SourceError::Syntax(_)));
    }

    #[test]
    fn test_docs_loader_walks_tree() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("guides")).unwrap();
        fs::create_dir_all(docs.join("reference")).unwrap();
        fs::write(docs.join("index.mdx"), "---\ntitle: Home\n---\nWelcome").unwrap();
        fs::write(docs.join("guides/example.md"), "---\ntitle: Example\n---\nBody").unwrap();
        fs::write(docs.join("reference/Natural Numbers.md"), "---\ntitle: N\n---\n").unwrap();
        fs::write(docs.join("reference/_draft.md"), "---\ntitle: Hidden\n---\n").unwrap();
        fs::write(docs.join("reference/notes.txt"), "ignored").unwrap();

        let records = DocsLoader::new(&docs).load().unwrap();
        let ids: Vec<_> = records.iter().filter_map(|r| r.locator.key.clone()).collect();
        assert_eq!(ids, vec!["guides/example", "index", "reference/natural-numbers"]);
        assert_eq!(records[0].body.as_deref(), Some("Body"));
        assert_eq!(records[0].data["title"], "Example");
    }

    #[test]
    fn test_docs_loader_slug_override() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("page.md"), "---\ntitle: Page\nslug: /custom/path/\n---\n").unwrap();

        let records = DocsLoader::new(dir.path()).load().unwrap();
        assert_eq!(records[0].locator.key.as_deref(), Some("custom/path"));
    }

    #[test]
    fn test_docs_loader_missing_dir() {
        let err = DocsLoader::new("/nonexistent/docs").load().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path(Path::new("guides/example.md")), "guides/example");
        assert_eq!(slug_from_path(Path::new("reference/index.mdx")), "reference");
        assert_eq!(slug_from_path(Path::new("index.md")), "index");
        assert_eq!(slug_from_path(Path::new("Guides/Hello, World!.md")), "guides/hello-world");
        assert_eq!(slug_from_path(Path::new("справка/Числа.md")), "справка/числа");
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new(vec![json!({"id": 1}), json!({"name": "x"})]);
        let records = loader.load().unwrap();
        assert_eq!(records[0].locator.key.as_deref(), Some("1"));
        assert_eq!(records[1].locator.key, None);
        assert_eq!(records[1].locator.to_string(), "record #2");
    }

    #[test]
    fn test_locator_display() {
        let locator = RecordLocator {
            index: 1,
            key: Some("2".to_string()),
        };
        assert_eq!(locator.to_string(), "id=2 (record #2)");
    }
}
