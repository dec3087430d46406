//! Error taxonomy for configuration and collection resolution

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::loader::SourceError;
use crate::schema::validator::ValidationError;

/// Problems with how collections or the site are configured.
///
/// These are detected before any record is read (except `UnknownSlug`,
/// which needs the resolved docs collection).
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("collection '{name}' is already registered")]
    #[diagnostic(
        code(hestia::config::duplicate_collection),
        help("every collection needs a unique name")
    )]
    DuplicateCollection { name: String },

    #[error("no collection named '{name}' is registered")]
    #[diagnostic(code(hestia::config::unknown_collection), help("registered collections: {known}"))]
    UnknownCollection { name: String, known: String },

    #[error("invalid site configuration in {path}: {}", problems.join("; "))]
    #[diagnostic(code(hestia::config::invalid_site))]
    InvalidSite { path: PathBuf, problems: Vec<String> },

    #[error("the slug '{slug}' used in the sidebar does not exist in the docs collection")]
    #[diagnostic(
        code(hestia::config::unknown_slug),
        help("check the sidebar entry or create the page it points to")
    )]
    UnknownSlug { slug: String },

    #[error("not inside a site project (searched from {searched_from})")]
    #[diagnostic(
        code(hestia::config::project_not_found),
        help("run from a directory containing site.yaml or pass --project")
    )]
    ProjectNotFound { searched_from: PathBuf },

    #[error("cannot load settings from {path}: {message}")]
    #[diagnostic(code(hestia::config::settings))]
    Settings { path: PathBuf, message: String },

    #[error("schema for collection '{collection}' is invalid: {message}")]
    #[diagnostic(code(hestia::config::schema))]
    Schema { collection: String, message: String },
}

/// Any failure while resolving a collection.
#[derive(Debug, Error, Diagnostic)]
pub enum CollectionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("collection '{collection}': {source}")]
    #[diagnostic(code(hestia::collection::source))]
    Source {
        collection: String,
        #[source]
        #[diagnostic_source]
        source: SourceError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),
}

impl CollectionError {
    /// Name of the collection that failed, when the failure is tied to one.
    pub fn collection(&self) -> Option<&str> {
        match self {
            CollectionError::Source { collection, .. } => Some(collection),
            CollectionError::Validation(e) => Some(e.collection()),
            CollectionError::Configuration(_) => None,
        }
    }
}
