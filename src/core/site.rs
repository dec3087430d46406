//! Site configuration (`site.yaml`)
//!
//! Locales, title, social links and the navigation sidebar of the site.
//! Loading checks the YAML shape; [`SiteConfig::validate`] checks that the
//! values agree with each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigurationError;
use crate::core::loader::SourceError;
use crate::schema::field::absolute_url;
use crate::yaml::SyntaxError;

/// Typed site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Deployed base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Path prefix the site is served under
    #[serde(default = "default_base")]
    pub base: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18n>,

    pub title: Title,

    /// Locale the documentation theme treats as default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social: Vec<SocialLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidebar: Vec<SidebarEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_css: Vec<String>,

    #[serde(skip)]
    path: PathBuf,
}

fn default_base() -> String {
    "/".to_string()
}

/// Routing locales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18n {
    #[serde(default)]
    pub locales: Vec<String>,
    pub default_locale: String,
}

/// Site title, either one string or one per locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Text(String),
    Localized(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub label: String,
    pub href: String,
}

/// One configured sidebar entry
///
/// Variants are tried in order, so the distinguishing key of each
/// (`autogenerate`, `items`, `link`, `slug`) decides the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarEntry {
    /// A bare page slug
    Slug(String),
    Autogenerate {
        label: String,
        autogenerate: Autogenerate,
    },
    Group {
        label: String,
        items: Vec<SidebarEntry>,
        #[serde(default)]
        collapsed: bool,
    },
    Link {
        label: String,
        link: String,
    },
    Page {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        slug: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autogenerate {
    pub directory: String,
    #[serde(default)]
    pub collapsed: bool,
}

impl SiteConfig {
    /// Read and parse a site file
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text, &path.display().to_string())?;
        config.path = path.to_path_buf();
        tracing::debug!(path = %path.display(), "loaded site configuration");
        Ok(config)
    }

    /// Parse site configuration from YAML text
    pub fn parse(text: &str, filename: &str) -> Result<Self, SyntaxError> {
        let mut config: SiteConfig =
            serde_yml::from_str(text).map_err(|e| SyntaxError::from_yaml(&e, text, filename, 0))?;
        config.path = PathBuf::from(filename);
        Ok(config)
    }

    /// Path the configuration was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The locale used when no other is requested
    pub fn default_locale(&self) -> Option<&str> {
        self.default_locale
            .as_deref()
            .or_else(|| self.i18n.as_ref().map(|i| i.default_locale.as_str()))
    }

    /// Title in the given locale, falling back to the default locale
    pub fn title_for(&self, locale: Option<&str>) -> Option<&str> {
        match &self.title {
            Title::Text(text) => Some(text),
            Title::Localized(titles) => locale
                .and_then(|l| titles.get(l))
                .or_else(|| self.default_locale().and_then(|l| titles.get(l)))
                .map(String::as_str),
        }
    }

    /// Check that the configured values are consistent, reporting every
    /// problem at once
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut problems = Vec::new();

        if let Some(i18n) = &self.i18n {
            if i18n.locales.is_empty() {
                problems.push("i18n.locales must list at least one locale".to_string());
            } else if !i18n.locales.contains(&i18n.default_locale) {
                problems.push(format!(
                    "i18n.default_locale '{}' is not one of the configured locales ({})",
                    i18n.default_locale,
                    i18n.locales.join(", ")
                ));
            }

            if let Some(locale) = &self.default_locale {
                if !i18n.locales.is_empty() && !i18n.locales.contains(locale) {
                    problems.push(format!("default_locale '{}' is not one of the configured locales", locale));
                }
            }
        }

        if !self.base.starts_with('/') {
            problems.push(format!("base '{}' must start with '/'", self.base));
        }

        if let Some(site) = &self.site {
            if absolute_url(site).is_none() {
                problems.push(format!("site '{}' is not an absolute URL", site));
            }
        }

        match &self.title {
            Title::Text(text) if text.trim().is_empty() => {
                problems.push("title must not be empty".to_string());
            }
            Title::Localized(titles) if titles.is_empty() => {
                problems.push("title must name at least one locale".to_string());
            }
            Title::Localized(titles) => {
                if let Some(locale) = self.default_locale() {
                    if !titles.contains_key(locale) {
                        problems.push(format!("title has no entry for the default locale '{}'", locale));
                    }
                }
            }
            Title::Text(_) => {}
        }

        for (i, link) in self.social.iter().enumerate() {
            if absolute_url(&link.href).is_none() {
                problems.push(format!("social[{}].href '{}' is not an absolute URL", i, link.href));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidSite {
                path: self.path.clone(),
                problems,
            })
        }
    }
}
