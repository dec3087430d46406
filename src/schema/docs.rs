//! Documentation page schema
//!
//! The frontmatter shape belongs to the documentation theme. It ships as a
//! JSON Schema document compiled at startup; records that pass it are then
//! converted into [`DocFrontmatter`] with a few value-level checks.

use chrono::{DateTime, NaiveDate};
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use url::Url;

use crate::core::error::ConfigurationError;
use crate::core::loader::RawRecord;
use crate::schema::field::{absolute_url, Constraint, FieldError, RECORD};
use crate::schema::Schema;

/// The documentation frontmatter schema, embedded at compile time
pub const DOCS_SCHEMA: &str = include_str!("../../schemas/docs.schema.json");

/// A validated documentation page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocPage {
    pub id: String,
    pub path: Option<PathBuf>,
    pub frontmatter: DocFrontmatter,
    /// The frontmatter exactly as written, including theme-only keys
    #[serde(skip)]
    pub data: JsonValue,
    #[serde(skip)]
    pub body: String,
}

impl DocPage {
    /// Label used for navigation: the sidebar label, falling back to the title
    pub fn nav_label(&self) -> &str {
        self.frontmatter
            .sidebar
            .label
            .as_deref()
            .unwrap_or(&self.frontmatter.title)
    }
}

/// Typed frontmatter of a documentation page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFrontmatter {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<EditUrl>,
    pub template: Template,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<TableOfContents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdated>,
    pub sidebar: SidebarMeta,
    pub pagefind: bool,
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EditUrl {
    Enabled(bool),
    Url(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LastUpdated {
    Enabled(bool),
    Date(NaiveDate),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Doc,
    Splash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableOfContents {
    Enabled(bool),
    #[serde(rename_all = "camelCase")]
    Levels {
        #[serde(default = "default_min_heading")]
        min_heading_level: u8,
        #[serde(default = "default_max_heading")]
        max_heading_level: u8,
    },
}

/// Sidebar settings for pages in autogenerated groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidebarMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Badge {
    Text(String),
    Styled {
        text: String,
        #[serde(default)]
        variant: BadgeVariant,
    },
}

impl Badge {
    pub fn text(&self) -> &str {
        match self {
            Badge::Text(text) | Badge::Styled { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Note,
    Danger,
    Success,
    Caution,
    Tip,
    #[default]
    Default,
}

fn default_min_heading() -> u8 {
    2
}

fn default_max_heading() -> u8 {
    3
}

fn default_true() -> bool {
    true
}

/// Frontmatter as deserialized before value-level checks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrontmatter {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    edit_url: Option<BoolOrText>,
    #[serde(default)]
    template: Template,
    #[serde(default)]
    table_of_contents: Option<TableOfContents>,
    #[serde(default)]
    last_updated: Option<BoolOrText>,
    #[serde(default)]
    sidebar: SidebarMeta,
    #[serde(default = "default_true")]
    pagefind: bool,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

/// Compiled documentation schema
pub struct DocsSchema {
    document: JsonValue,
    compiled: JsonValidator,
}

impl std::fmt::Debug for DocsSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsSchema").finish_non_exhaustive()
    }
}

impl DocsSchema {
    /// Compile the embedded schema document
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::from_document(DOCS_SCHEMA)
    }

    /// Compile a schema document given as JSON text
    pub fn from_document(text: &str) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::Schema {
            collection: "docs".to_string(),
            message,
        };

        let document: JsonValue = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
        let compiled = validator_for(&document).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { document, compiled })
    }
}

impl Schema for DocsSchema {
    type Entry = DocPage;

    fn validate(&self, record: &RawRecord) -> Result<DocPage, Vec<FieldError>> {
        let violations: Vec<FieldError> = self
            .compiled
            .iter_errors(&record.data)
            .map(|e| error_to_field(&e))
            .collect();
        if !violations.is_empty() {
            return Err(violations);
        }

        let raw: RawFrontmatter = serde_json::from_value(record.data.clone()).map_err(|e| {
            vec![FieldError::with_message(
                RECORD,
                Constraint::Schema {
                    rule: "frontmatter".to_string(),
                },
                e.to_string(),
            )]
        })?;

        let mut errors = Vec::new();

        let edit_url = match raw.edit_url {
            None => None,
            Some(BoolOrText::Bool(enabled)) => Some(EditUrl::Enabled(enabled)),
            Some(BoolOrText::Text(text)) => match absolute_url(&text) {
                Some(url) => Some(EditUrl::Url(url)),
                None => {
                    errors.push(FieldError::new("editUrl", Constraint::Url));
                    None
                }
            },
        };

        let last_updated = match raw.last_updated {
            None => None,
            Some(BoolOrText::Bool(enabled)) => Some(LastUpdated::Enabled(enabled)),
            Some(BoolOrText::Text(text)) => match parse_date(&text) {
                Some(date) => Some(LastUpdated::Date(date)),
                None => {
                    errors.push(FieldError::new("lastUpdated", Constraint::Date));
                    None
                }
            },
        };

        if let Some(TableOfContents::Levels {
            min_heading_level,
            max_heading_level,
        }) = raw.table_of_contents
        {
            if min_heading_level > max_heading_level {
                errors.push(FieldError::with_message(
                    "tableOfContents",
                    Constraint::Schema {
                        rule: "heading range".to_string(),
                    },
                    "minHeadingLevel must not exceed maxHeadingLevel",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(DocPage {
            id: record
                .locator
                .key
                .clone()
                .unwrap_or_else(|| record.locator.index.to_string()),
            path: record.origin.as_ref().map(|o| o.path.clone()),
            frontmatter: DocFrontmatter {
                title: raw.title,
                description: raw.description,
                slug: raw.slug,
                edit_url,
                template: raw.template,
                table_of_contents: raw.table_of_contents,
                last_updated,
                sidebar: raw.sidebar,
                pagefind: raw.pagefind,
                draft: raw.draft,
            },
            data: record.data.clone(),
            body: record.body.clone().unwrap_or_default(),
        })
    }

    fn json_schema(&self) -> JsonValue {
        self.document.clone()
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|d| d.date_naive()))
}

/// Convert a JSON Schema error into a field error
fn error_to_field(error: &JsonSchemaError) -> FieldError {
    use jsonschema::error::ValidationErrorKind as Kind;

    let path = error
        .instance_path
        .as_str()
        .trim_start_matches('/')
        .replace('/', ".");

    match &error.kind {
        Kind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            let field = if path.is_empty() { prop } else { format!("{}.{}", path, prop) };
            FieldError::new(field, Constraint::Required)
        }
        kind => {
            let field = if path.is_empty() { RECORD.to_string() } else { path };
            let rule = match kind {
                Kind::Type { .. } => "type",
                Kind::Enum { .. } => "allowed values",
                Kind::MinLength { .. } => "minimum length",
                Kind::MaxLength { .. } => "maximum length",
                Kind::Minimum { .. } => "minimum",
                Kind::Maximum { .. } => "maximum",
                Kind::OneOfNotValid { .. } | Kind::OneOfMultipleValid { .. } => "one of",
                _ => "schema",
            };
            let message = match kind {
                Kind::Enum { options } => format!("must be one of: {}", format_enum_options(options)),
                Kind::MinLength { limit } if *limit == 1 => "must not be empty".to_string(),
                _ => error.to_string(),
            };
            FieldError::with_message(
                field,
                Constraint::Schema {
                    rule: rule.to_string(),
                },
                message,
            )
        }
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}
