//! Tool settings with layered hierarchy
//!
//! Later layers win: built-in defaults, the global user file, the project's
//! `.hestia/config.yaml`, then `HESTIA_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::ConfigurationError;
use crate::core::project::Project;

/// Default content directory, relative to the project root
pub const DEFAULT_CONTENT_DIR: &str = "src/content";
/// Default comments data file, relative to the content directory
pub const DEFAULT_COMMENTS_FILE: &str = "comments/comments.yaml";
/// Default docs tree, relative to the content directory
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Settings keys with their descriptions
pub const KEYS: &[(&str, &str)] = &[
    ("content_dir", "Content directory, relative to the project root"),
    ("comments_file", "Comments data file, relative to the content directory"),
    ("docs_dir", "Documentation tree, relative to the content directory"),
    ("default_format", "Default output format (yaml, json, tsv, csv, md, id)"),
];

/// hestia-site settings
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content directory
    pub content_dir: Option<PathBuf>,

    /// Comments data file
    pub comments_file: Option<PathBuf>,

    /// Documentation tree
    pub docs_dir: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load settings from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Result<Self, ConfigurationError> {
        Self::layered(
            Self::global_config_path().as_deref(),
            project.map(Project::config_file).as_deref(),
            |key| std::env::var(key).ok(),
        )
    }

    fn layered(
        global: Option<&Path>,
        project: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let mut config = Config::default();

        for path in [global, project].into_iter().flatten() {
            if let Some(layer) = Self::from_file(path)? {
                tracing::debug!(path = %path.display(), "loaded settings");
                config.merge(layer);
            }
        }

        if let Some(dir) = env("HESTIA_CONTENT_DIR") {
            config.content_dir = Some(PathBuf::from(dir));
        }
        if let Some(format) = env("HESTIA_FORMAT") {
            config.default_format = Some(format);
        }

        Ok(config)
    }

    /// Read one settings file. A missing file is not an error.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigurationError> {
        if !path.exists() {
            return Ok(None);
        }

        let settings_error = |message: String| ConfigurationError::Settings {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        if contents.trim().is_empty() {
            return Ok(Some(Config::default()));
        }
        serde_yml::from_str(&contents)
            .map(Some)
            .map_err(|e| settings_error(e.to_string()))
    }

    /// Get the path to the global settings file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hestia-site").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.content_dir.is_some() {
            self.content_dir = other.content_dir;
        }
        if other.comments_file.is_some() {
            self.comments_file = other.comments_file;
        }
        if other.docs_dir.is_some() {
            self.docs_dir = other.docs_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Value of a settings key, if set
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match key {
            "content_dir" => path(&self.content_dir),
            "comments_file" => path(&self.comments_file),
            "docs_dir" => path(&self.docs_dir),
            "default_format" => self.default_format.clone(),
            _ => None,
        }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
    }

    pub fn comments_file(&self) -> PathBuf {
        self.comments_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMMENTS_FILE))
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.docs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR))
    }
}
