//! Project discovery and structure

use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::error::ConfigurationError;

/// File that marks the root of a site project
pub const SITE_FILE: &str = "site.yaml";

/// Directory holding project-level tool settings
pub const CONFIG_DIR: &str = ".hestia";

/// Represents a site project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (the directory holding site.yaml)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ConfigurationError> {
        let current = std::env::current_dir().map_err(|_| ConfigurationError::ProjectNotFound {
            searched_from: PathBuf::from("."),
        })?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ConfigurationError> {
        let not_found = || ConfigurationError::ProjectNotFound {
            searched_from: start.to_path_buf(),
        };
        let mut current = start.canonicalize().map_err(|_| not_found())?;

        loop {
            if current.join(SITE_FILE).is_file() {
                tracing::debug!(root = %current.display(), "found site project");
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(not_found());
            }
        }
    }

    /// Use `path` as the project root without searching
    pub fn at(path: &Path) -> Result<Self, ConfigurationError> {
        if !path.is_dir() {
            return Err(ConfigurationError::ProjectNotFound {
                searched_from: path.to_path_buf(),
            });
        }
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Ok(Self { root })
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the site configuration
    pub fn site_file(&self) -> PathBuf {
        self.root.join(SITE_FILE)
    }

    /// Get the .hestia settings directory
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// Path of the project-level settings file
    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.yaml")
    }

    /// Content locations for this project under the given settings
    pub fn layout(&self, config: &Config) -> Layout {
        Layout::new(&self.root, config)
    }
}

/// Where a project's content lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    content_dir: PathBuf,
    comments_file: PathBuf,
    docs_dir: PathBuf,
}

impl Layout {
    /// Relative settings resolve against `root`; the collection paths
    /// resolve against the content directory
    pub fn new(root: &Path, config: &Config) -> Self {
        let content_dir = root.join(config.content_dir());
        Self {
            comments_file: content_dir.join(config.comments_file()),
            docs_dir: content_dir.join(config.docs_dir()),
            content_dir,
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn comments_file(&self) -> &Path {
        &self.comments_file
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }
}
