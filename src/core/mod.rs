//! Core module - collections, loaders and site configuration

pub mod collection;
pub mod config;
pub mod error;
pub mod loader;
pub mod project;
pub mod sidebar;
pub mod site;

pub use collection::{Collection, ContentCollectionRegistry, ContentEntry, Entry, ResolvedCollections};
pub use config::Config;
pub use error::{CollectionError, ConfigurationError};
pub use loader::{DocsLoader, FileLoader, Loader, MemoryLoader, RawRecord, SourceError};
pub use project::{Layout, Project};
pub use sidebar::{resolve_sidebar, NavItem};
pub use site::SiteConfig;
