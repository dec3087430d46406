//! Content collection registry
//!
//! Binds collection names to a loader and a schema, and resolves them into
//! validated, typed collections. A collection resolves completely or not at
//! all: a single invalid record fails the whole collection.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::core::error::{CollectionError, ConfigurationError};
use crate::core::loader::{DocsLoader, FileLoader, Loader, RawRecord, RecordLocator};
use crate::core::project::Layout;
use crate::schema::field::{Constraint, FieldError};
use crate::schema::validator::{RecordFailure, ValidationError};
use crate::schema::{Comment, CommentSchema, DocPage, DocsSchema, Schema};

/// Name of the comments collection
pub const COMMENTS: &str = "comments";
/// Name of the documentation collection
pub const DOCS: &str = "docs";

/// Typed data of a validated entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Comment(Comment),
    Doc(DocPage),
}

impl ContentEntry {
    /// The id that must be unique within the collection
    pub fn id(&self) -> String {
        match self {
            ContentEntry::Comment(c) => c.id.to_string(),
            ContentEntry::Doc(d) => d.id.clone(),
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            ContentEntry::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_doc(&self) -> Option<&DocPage> {
        match self {
            ContentEntry::Doc(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Comment> for ContentEntry {
    fn from(comment: Comment) -> Self {
        ContentEntry::Comment(comment)
    }
}

impl From<DocPage> for ContentEntry {
    fn from(doc: DocPage) -> Self {
        ContentEntry::Doc(doc)
    }
}

/// One validated entry
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub locator: RecordLocator,
    pub data: ContentEntry,
}

/// A resolved collection, in the loader's order
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    entries: Vec<Entry>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.entries.iter().filter_map(|e| e.data.as_comment())
    }

    pub fn docs(&self) -> impl Iterator<Item = &DocPage> {
        self.entries.iter().filter_map(|e| e.data.as_doc())
    }
}

/// Every registered collection, resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCollections {
    collections: Vec<Collection>,
}

impl ResolvedCollections {
    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }
}

/// Object-safe view of a [`Schema`] whose entries convert to [`ContentEntry`]
trait EntrySchema: Send + Sync {
    fn validate_entry(&self, record: &RawRecord) -> Result<ContentEntry, Vec<FieldError>>;
    fn json_schema(&self) -> JsonValue;
}

impl<S> EntrySchema for S
where
    S: Schema,
    S::Entry: Into<ContentEntry>,
{
    fn validate_entry(&self, record: &RawRecord) -> Result<ContentEntry, Vec<FieldError>> {
        self.validate(record).map(Into::into)
    }

    fn json_schema(&self) -> JsonValue {
        Schema::json_schema(self)
    }
}

struct Registration {
    name: String,
    loader: Box<dyn Loader>,
    schema: Box<dyn EntrySchema>,
}

/// Maps collection names to (loader, schema) pairs
#[derive(Default)]
pub struct ContentCollectionRegistry {
    collections: Vec<Registration>,
}

impl std::fmt::Debug for ContentCollectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCollectionRegistry")
            .field("collections", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl ContentCollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site's collections: comments from a data file, docs from the
    /// documentation tree
    pub fn builtin(layout: &Layout) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        registry.register(COMMENTS, FileLoader::new(layout.comments_file()), CommentSchema)?;
        registry.register(DOCS, DocsLoader::new(layout.docs_dir()), DocsSchema::new()?)?;
        Ok(registry)
    }

    /// Register a collection. Names must be unique.
    pub fn register<L, S>(&mut self, name: impl Into<String>, loader: L, schema: S) -> Result<(), ConfigurationError>
    where
        L: Loader + 'static,
        S: Schema + 'static,
        S::Entry: Into<ContentEntry>,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigurationError::DuplicateCollection { name });
        }

        tracing::debug!(collection = %name, source = %loader.describe(), "registered collection");
        self.collections.push(Registration {
            name,
            loader: Box::new(loader),
            schema: Box::new(schema),
        });
        Ok(())
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|r| r.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.iter().any(|r| r.name == name)
    }

    /// JSON Schema of a collection's records
    pub fn json_schema(&self, name: &str) -> Result<JsonValue, ConfigurationError> {
        Ok(self.registration(name)?.schema.json_schema())
    }

    /// Description of a collection's source
    pub fn source(&self, name: &str) -> Result<String, ConfigurationError> {
        Ok(self.registration(name)?.loader.describe())
    }

    /// Load and validate one collection
    pub fn resolve(&self, name: &str) -> Result<Collection, CollectionError> {
        let registration = self.registration(name)?;
        resolve_registration(registration)
    }

    /// Resolve every collection. Collections are independent and resolve in
    /// parallel; the first failure in registration order is returned.
    pub fn resolve_all(&self) -> Result<ResolvedCollections, CollectionError> {
        let results: Vec<Result<Collection, CollectionError>> =
            self.collections.par_iter().map(resolve_registration).collect();

        let collections = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedCollections { collections })
    }

    fn registration(&self, name: &str) -> Result<&Registration, ConfigurationError> {
        self.collections
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ConfigurationError::UnknownCollection {
                name: name.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })
    }
}

fn resolve_registration(registration: &Registration) -> Result<Collection, CollectionError> {
    let name = registration.name.as_str();
    let records = registration.loader.load().map_err(|source| CollectionError::Source {
        collection: name.to_string(),
        source,
    })?;

    let mut entries = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for record in &records {
        match registration.schema.validate_entry(record) {
            Ok(data) => {
                let id = data.id();
                if let Some(first) = seen.get(&id) {
                    let error = FieldError::with_message(
                        "id",
                        Constraint::Unique,
                        format!("'{}' is already used by record #{}", id, first + 1),
                    );
                    failures.push(RecordFailure::new(record, vec![error]));
                    continue;
                }
                seen.insert(id.clone(), record.locator.index);
                entries.push(Entry {
                    id,
                    locator: record.locator.clone(),
                    data,
                });
            }
            Err(errors) => failures.push(RecordFailure::new(record, errors)),
        }
    }

    if !failures.is_empty() {
        tracing::warn!(collection = name, invalid = failures.len(), "collection failed validation");
        return Err(ValidationError::new(name, failures).into());
    }

    tracing::info!(collection = name, entries = entries.len(), "resolved collection");
    Ok(Collection {
        name: name.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::{MemoryLoader, SourceError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn comment(id: JsonValue, avatar: &str) -> JsonValue {
        json!({
            "id": id,
            "name": "Ann",
            "login": "ann",
            "body": "Great tool",
            "avatar": avatar,
            "href": "https://x.test/ann",
        })
    }

    fn registry_with(records: Vec<JsonValue>) -> ContentCollectionRegistry {
        let mut registry = ContentCollectionRegistry::new();
        registry
            .register(COMMENTS, MemoryLoader::new(records), CommentSchema)
            .unwrap();
        registry
    }

    /// Counts how often the source was read
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
    }

    impl Loader for CountingLoader {
        fn load(&self) -> Result<Vec<RawRecord>, SourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn test_resolve_valid_comments_in_order() {
        let registry = registry_with(vec![
            comment(json!(2), "https://x.test/b.png"),
            comment(json!(1), "https://x.test/a.png"),
        ]);

        let collection = registry.resolve(COMMENTS).unwrap();
        assert_eq!(collection.len(), 2);
        let ids: Vec<_> = collection.comments().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(collection.get("1").is_some());
    }

    #[test]
    fn test_invalid_record_fails_whole_collection() {
        let registry = registry_with(vec![
            comment(json!(1), "https://x.test/a.png"),
            comment(json!(2), "not-a-url"),
        ]);

        let err = registry.resolve(COMMENTS).unwrap_err();
        let CollectionError::Validation(err) = err else {
            panic!("expected a validation error, got {:?}", err);
        };
        assert_eq!(err.collection(), COMMENTS);
        assert_eq!(err.failures().len(), 1);

        let failure = &err.failures()[0];
        assert_eq!(failure.locator.key.as_deref(), Some("2"));
        assert!(failure.has_field("avatar"));
        assert_eq!(failure.errors[0].message, "not a well-formed URL");
    }

    #[test]
    fn test_non_positive_id_names_field() {
        let registry = registry_with(vec![comment(json!(0), "https://x.test/a.png")]);
        let CollectionError::Validation(err) = registry.resolve(COMMENTS).unwrap_err() else {
            panic!("expected a validation error");
        };
        assert!(err.failures()[0].has_field("id"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let registry = registry_with(vec![
            comment(json!(1), "https://x.test/a.png"),
            comment(json!("1"), "https://x.test/b.png"),
        ]);

        let CollectionError::Validation(err) = registry.resolve(COMMENTS).unwrap_err() else {
            panic!("expected a validation error");
        };
        let failure = &err.failures()[0];
        assert_eq!(failure.locator.index, 1);
        assert_eq!(failure.errors[0].constraint, Constraint::Unique);
    }

    #[test]
    fn test_large_ids_stay_distinct() {
        let registry = registry_with(vec![
            comment(json!(9_223_372_036_854_775_808u64), "https://x.test/a.png"),
            comment(json!(9_223_372_036_854_775_809u64), "https://x.test/b.png"),
            comment(json!(u64::MAX), "https://x.test/c.png"),
        ]);

        let collection = registry.resolve(COMMENTS).unwrap();
        let ids: Vec<_> = collection.comments().map(|c| c.id).collect();
        assert_eq!(ids, vec![9_223_372_036_854_775_808, 9_223_372_036_854_775_809, u64::MAX]);
    }

    #[test]
    fn test_every_invalid_record_is_reported() {
        let registry = registry_with(vec![
            comment(json!(-1), "https://x.test/a.png"),
            comment(json!(2), "https://x.test/b.png"),
            json!({"id": 3}),
        ]);

        let CollectionError::Validation(err) = registry.resolve(COMMENTS).unwrap_err() else {
            panic!("expected a validation error");
        };
        assert_eq!(err.failures().len(), 2);
        assert_eq!(err.failures()[1].errors.len(), 5);
    }

    #[test]
    fn test_empty_collection_resolves() {
        let registry = registry_with(Vec::new());
        assert!(registry.resolve(COMMENTS).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let registry = registry_with(vec![comment(json!(1), "https://x.test/a.png")]);
        assert_eq!(registry.resolve(COMMENTS).unwrap(), registry.resolve(COMMENTS).unwrap());
    }

    #[test]
    fn test_duplicate_registration_before_any_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let mut registry = ContentCollectionRegistry::new();
        registry
            .register(
                COMMENTS,
                CountingLoader {
                    loads: Arc::clone(&loads),
                },
                CommentSchema,
            )
            .unwrap();

        let err = registry
            .register(
                COMMENTS,
                CountingLoader {
                    loads: Arc::clone(&loads),
                },
                CommentSchema,
            )
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::DuplicateCollection { .. }));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_collection() {
        let registry = registry_with(Vec::new());
        let err = registry.resolve("authors").unwrap_err();
        assert!(matches!(
            err,
            CollectionError::Configuration(ConfigurationError::UnknownCollection { .. })
        ));
    }

    #[test]
    fn test_resolve_all_keeps_registration_order() {
        let mut registry = registry_with(vec![comment(json!(1), "https://x.test/a.png")]);
        registry
            .register("testimonials", MemoryLoader::new(Vec::new()), CommentSchema)
            .unwrap();

        let resolved = registry.resolve_all().unwrap();
        let names: Vec<_> = resolved.names().collect();
        assert_eq!(names, vec![COMMENTS, "testimonials"]);
        assert_eq!(resolved.get(COMMENTS).unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_all_reports_failure() {
        let mut registry = registry_with(vec![comment(json!(1), "https://x.test/a.png")]);
        registry
            .register("broken", MemoryLoader::new(vec![json!({"id": 0})]), CommentSchema)
            .unwrap();

        let err = registry.resolve_all().unwrap_err();
        assert_eq!(err.collection(), Some("broken"));
    }
}
