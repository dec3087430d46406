//! Per-field checks over a raw record
//!
//! Each field is checked for presence, then type, then its refinement
//! constraints. Checks on one field stop at the first failure; failures on
//! different fields accumulate so a record reports every problem at once.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use url::Url;

/// Field name used for problems with the record as a whole
pub const RECORD: &str = "$";

/// The constraint a field failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Field is absent
    Required,
    /// Field has the wrong type
    Type { expected: String, found: String },
    /// Number must be greater than zero
    Positive,
    /// Text must not be empty
    NonEmpty,
    /// Text must be an absolute URL with a scheme and host
    Url,
    /// Value must be a recognised date
    Date,
    /// Id already used by an earlier record
    Unique,
    /// Rule from an external schema document
    Schema { rule: String },
}

impl Constraint {
    /// Short label for the constraint, suitable for a diagnostic label
    pub fn hint(&self) -> &str {
        match self {
            Constraint::Required => "required field missing",
            Constraint::Type { .. } => "wrong type",
            Constraint::Positive => "not positive",
            Constraint::NonEmpty => "empty",
            Constraint::Url => "not a URL",
            Constraint::Date => "not a date",
            Constraint::Unique => "duplicate",
            Constraint::Schema { rule } => rule,
        }
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        let message = default_message(&constraint);
        Self {
            field: field.into(),
            constraint,
            message,
        }
    }

    pub fn with_message(field: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    pub fn is_record_level(&self) -> bool {
        self.field == RECORD
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_record_level() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

fn default_message(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Required => "required field is missing".to_string(),
        Constraint::Type { expected, found } => format!("expected {}, found {}", expected, found),
        Constraint::Positive => "must be a positive integer".to_string(),
        Constraint::NonEmpty => "must not be empty".to_string(),
        Constraint::Url => "not a well-formed URL".to_string(),
        Constraint::Date => "not a valid date".to_string(),
        Constraint::Unique => "is already used by another record".to_string(),
        Constraint::Schema { rule } => format!("violates {}", rule),
    }
}

/// JSON type name of a value, as used in type mismatch messages
pub fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Parse an absolute URL: a scheme and a host must both be present
pub fn absolute_url(text: &str) -> Option<Url> {
    Url::parse(text.trim()).ok().filter(|url| url.has_host())
}

/// Reads typed fields out of a record while collecting failures
#[derive(Debug)]
pub struct Fields<'a> {
    map: Option<&'a Map<String, JsonValue>>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    /// Start reading `record`. A non-object record is itself an error and
    /// every field read afterwards yields `None` without further reports.
    pub fn new(record: &'a JsonValue) -> Self {
        match record {
            JsonValue::Object(map) => Self {
                map: Some(map),
                errors: Vec::new(),
            },
            other => Self {
                map: None,
                errors: vec![FieldError::new(
                    RECORD,
                    Constraint::Type {
                        expected: "object".to_string(),
                        found: kind_of(other).to_string(),
                    },
                )],
            },
        }
    }

    /// Errors collected so far
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn present(&mut self, name: &str) -> Option<&'a JsonValue> {
        let map = self.map?;
        match map.get(name) {
            Some(value) => Some(value),
            None => {
                self.errors.push(FieldError::new(name, Constraint::Required));
                None
            }
        }
    }

    fn wrong_type(&mut self, name: &str, expected: &str, found: &JsonValue) {
        self.errors.push(FieldError::new(
            name,
            Constraint::Type {
                expected: expected.to_string(),
                found: kind_of(found).to_string(),
            },
        ));
    }

    fn string(&mut self, name: &str) -> Option<&'a str> {
        let value = self.present(name)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.wrong_type(name, "string", value);
                None
            }
        }
    }

    /// A positive integer. Numeric strings are coerced.
    pub fn positive_int(&mut self, name: &str) -> Option<u64> {
        let value = self.present(name)?;
        let (unsigned, signed) = match value {
            JsonValue::Number(n) => (n.as_u64(), n.as_i64()),
            JsonValue::String(s) => {
                let s = s.trim();
                (s.parse::<u64>().ok(), s.parse::<i64>().ok())
            }
            _ => (None, None),
        };

        match (unsigned, signed) {
            (Some(number), _) if number > 0 => Some(number),
            (Some(_), _) | (None, Some(_)) => {
                self.errors.push(FieldError::new(name, Constraint::Positive));
                None
            }
            (None, None) => {
                self.wrong_type(name, "integer", value);
                None
            }
        }
    }

    /// Text that is not blank
    pub fn non_empty_str(&mut self, name: &str) -> Option<String> {
        let text = self.string(name)?;
        if text.trim().is_empty() {
            self.errors.push(FieldError::new(name, Constraint::NonEmpty));
            return None;
        }
        Some(text.to_string())
    }

    /// Text holding an absolute URL
    pub fn url(&mut self, name: &str) -> Option<Url> {
        let text = self.string(name)?;
        match absolute_url(text) {
            Some(url) => Some(url),
            None => {
                self.errors.push(FieldError::new(name, Constraint::Url));
                None
            }
        }
    }
}
