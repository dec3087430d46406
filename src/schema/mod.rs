//! Schema system - per-collection record validation

pub mod comment;
pub mod docs;
pub mod field;
pub mod validator;

use serde_json::Value as JsonValue;

use crate::core::loader::RawRecord;

pub use comment::{Comment, CommentSchema};
pub use docs::{DocPage, DocsSchema};
pub use field::{Constraint, FieldError};
pub use validator::{RecordFailure, ValidationError};

/// Validates and types one raw record
pub trait Schema: Send + Sync {
    /// The typed entry produced for a valid record
    type Entry;

    /// Check every field of `record`, returning all failures when it is invalid
    fn validate(&self, record: &RawRecord) -> Result<Self::Entry, Vec<FieldError>>;

    /// JSON Schema description of the accepted records
    fn json_schema(&self) -> JsonValue;
}
