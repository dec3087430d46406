//! Validation errors with source locations
//!
//! A [`ValidationError`] covers one collection and holds a [`RecordFailure`]
//! for every record that was rejected. When a record's source text is known
//! each failing field is labelled in place.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt;
use thiserror::Error;

use crate::core::loader::{RawRecord, RecordLocator, RecordOrigin};
use crate::schema::field::FieldError;

/// A collection failed validation
#[derive(Debug, Error, Diagnostic)]
#[error("collection '{collection}' failed validation: {summary}")]
#[diagnostic(
    code(hestia::schema::validation_error),
    help("fix the listed fields in the source data; no entries were loaded")
)]
pub struct ValidationError {
    collection: String,
    summary: String,

    #[related]
    failures: Vec<RecordFailure>,
}

impl ValidationError {
    pub fn new(collection: impl Into<String>, failures: Vec<RecordFailure>) -> Self {
        let count = failures.len();
        let summary = if count == 1 {
            "1 invalid record".to_string()
        } else {
            format!("{} invalid records", count)
        };
        Self {
            collection: collection.into(),
            summary,
            failures,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn failures(&self) -> &[RecordFailure] {
        &self.failures
    }

    /// Total number of failing fields across all records
    pub fn violation_count(&self) -> usize {
        self.failures.iter().map(|f| f.errors.len()).sum()
    }

    /// One line per failing field: collection, record, field and reason
    pub fn report_lines(&self) -> Vec<String> {
        self.failures
            .iter()
            .flat_map(|failure| {
                failure
                    .errors
                    .iter()
                    .map(move |e| format!("{}: {}: {}", self.collection, failure.locator, e))
            })
            .collect()
    }
}

/// One rejected record with all of its field errors
#[derive(Debug)]
pub struct RecordFailure {
    pub locator: RecordLocator,
    pub errors: Vec<FieldError>,
    src: Option<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
}

impl RecordFailure {
    pub fn new(record: &RawRecord, errors: Vec<FieldError>) -> Self {
        let (src, labels) = match &record.origin {
            Some(origin) => (
                Some(NamedSource::new(origin.path.display().to_string(), origin.text.to_string())),
                errors.iter().map(|e| label_for(origin, e)).collect(),
            ),
            None => (None, Vec::new()),
        };

        Self {
            locator: record.locator.clone(),
            errors,
            src,
            labels,
        }
    }

    /// Whether any error concerns `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "record {}: {}", self.locator, reasons.join("; "))
    }
}

impl std::error::Error for RecordFailure {}

impl Diagnostic for RecordFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("hestia::schema::invalid_record"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|s| s as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.iter().cloned()))
        }
    }
}

/// Label a field error at its key, or at the record when the key is absent
fn label_for(origin: &RecordOrigin, error: &FieldError) -> LabeledSpan {
    let record_text = origin.record_text();
    let base = origin.record_offset();

    // For nested paths like `sidebar.order` the innermost key is searched
    let key = error.field.rsplit('.').next().unwrap_or(&error.field);

    let span = if error.is_record_level() {
        None
    } else {
        find_key_span(record_text, key)
    }
    .map(|span| SourceSpan::from((base + span.offset(), span.len())))
    .unwrap_or_else(|| first_line_span(record_text, base));

    LabeledSpan::new_with_span(Some(format!("{}", error)), span)
}

fn first_line_span(text: &str, base: usize) -> SourceSpan {
    let len = text.find('\n').unwrap_or(text.len()).max(1);
    (base, len).into()
}

/// Find the span of `key:` at the start of a line (after indentation or a
/// sequence dash)
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let search_pattern = format!("{}:", key);

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start().trim_start_matches("- ").trim_start();
        if trimmed.starts_with(&search_pattern) {
            let key_start = offset + (line.len() - trimmed.len());
            let key_len = trimmed.trim_end().len().max(1);
            return Some((key_start, key_len).into());
        }
        offset += line.len();
    }
    None
}
