//! Sidebar resolution
//!
//! Turns the configured sidebar into a concrete navigation tree: slugs are
//! checked against the docs collection and `autogenerate` groups are
//! expanded from the pages under their directory.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::collection::Collection;
use crate::core::error::ConfigurationError;
use crate::core::site::{SidebarEntry, SiteConfig};
use crate::schema::DocPage;

/// One item of the resolved navigation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavItem {
    Link {
        label: String,
        href: String,
        /// Docs entry the link points at, absent for external links
        #[serde(skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        badge: Option<String>,
    },
    Group {
        label: String,
        collapsed: bool,
        items: Vec<NavItem>,
    },
}

impl NavItem {
    pub fn label(&self) -> &str {
        match self {
            NavItem::Link { label, .. } | NavItem::Group { label, .. } => label,
        }
    }
}

/// Resolve the site's sidebar against the docs collection
pub fn resolve_sidebar(site: &SiteConfig, docs: &Collection) -> Result<Vec<NavItem>, ConfigurationError> {
    let resolver = Resolver {
        base: site.base.trim_end_matches('/'),
        docs,
    };
    site.sidebar.iter().map(|entry| resolver.entry(entry)).collect()
}

struct Resolver<'a> {
    base: &'a str,
    docs: &'a Collection,
}

impl Resolver<'_> {
    fn entry(&self, entry: &SidebarEntry) -> Result<NavItem, ConfigurationError> {
        match entry {
            SidebarEntry::Slug(slug) => self.page(None, slug),
            SidebarEntry::Page { label, slug } => self.page(label.as_deref(), slug),
            SidebarEntry::Link { label, link } => Ok(NavItem::Link {
                label: label.clone(),
                href: link.clone(),
                slug: None,
                badge: None,
            }),
            SidebarEntry::Group {
                label,
                items,
                collapsed,
            } => Ok(NavItem::Group {
                label: label.clone(),
                collapsed: *collapsed,
                items: items.iter().map(|e| self.entry(e)).collect::<Result<_, _>>()?,
            }),
            SidebarEntry::Autogenerate { label, autogenerate } => Ok(NavItem::Group {
                label: label.clone(),
                collapsed: autogenerate.collapsed,
                items: self.autogenerate(&autogenerate.directory, autogenerate.collapsed),
            }),
        }
    }

    fn page(&self, label: Option<&str>, slug: &str) -> Result<NavItem, ConfigurationError> {
        let slug = slug.trim_matches('/');
        let doc = self
            .docs
            .get(slug)
            .and_then(|e| e.data.as_doc())
            .ok_or_else(|| ConfigurationError::UnknownSlug { slug: slug.to_string() })?;

        let mut item = self.link(doc);
        if let (Some(label), NavItem::Link { label: current, .. }) = (label, &mut item) {
            *current = label.to_string();
        }
        Ok(item)
    }

    fn link(&self, doc: &DocPage) -> NavItem {
        let href = if doc.id == "index" {
            format!("{}/", self.base)
        } else {
            format!("{}/{}/", self.base, doc.id)
        };
        NavItem::Link {
            label: doc.nav_label().to_string(),
            href,
            slug: Some(doc.id.clone()),
            badge: doc.frontmatter.sidebar.badge.as_ref().map(|b| b.text().to_string()),
        }
    }

    /// Every visible page below `directory`, nested by subdirectory
    fn autogenerate(&self, directory: &str, collapsed: bool) -> Vec<NavItem> {
        let directory = directory.trim_matches('/');
        let mut root = Dir::default();

        for doc in self.docs.docs() {
            if doc.frontmatter.draft || doc.frontmatter.sidebar.hidden {
                continue;
            }
            let rest = if directory.is_empty() {
                Some(doc.id.as_str())
            } else {
                doc.id
                    .strip_prefix(directory)
                    .and_then(|rest| rest.strip_prefix('/'))
            };
            if let Some(rest) = rest {
                let segments: Vec<&str> = rest.split('/').collect();
                root.insert(&segments, doc);
            }
        }

        self.build(&root, directory, collapsed)
    }

    fn build(&self, dir: &Dir<'_>, prefix: &str, collapsed: bool) -> Vec<NavItem> {
        let mut keyed: Vec<(Option<f64>, String, NavItem)> = dir
            .pages
            .iter()
            .map(|doc| (doc.frontmatter.sidebar.order, doc.id.clone(), self.link(doc)))
            .collect();

        for (name, child) in &dir.dirs {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", prefix, name)
            };
            let group = NavItem::Group {
                label: name.to_string(),
                collapsed,
                items: self.build(child, &path, collapsed),
            };
            keyed.push((None, path, group));
        }

        keyed.sort_by(|a, b| by_order(a.0, b.0).then_with(|| a.1.cmp(&b.1)));
        keyed.into_iter().map(|(_, _, item)| item).collect()
    }
}

/// Pages sorted into directories by their id segments
#[derive(Default)]
struct Dir<'a> {
    pages: Vec<&'a DocPage>,
    dirs: BTreeMap<&'a str, Dir<'a>>,
}

impl<'a> Dir<'a> {
    fn insert(&mut self, segments: &[&'a str], doc: &'a DocPage) {
        match segments {
            [] | [_] => self.pages.push(doc),
            [first, rest @ ..] => self.dirs.entry(*first).or_default().insert(rest, doc),
        }
    }
}

/// Explicit orders first, ascending
fn by_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collection::{ContentCollectionRegistry, DOCS};
    use crate::core::loader::MemoryLoader;
    use crate::schema::DocsSchema;
    use serde_json::{json, Value as JsonValue};

    fn docs(pages: Vec<JsonValue>) -> Collection {
        let mut registry = ContentCollectionRegistry::new();
        registry
            .register(DOCS, MemoryLoader::new(pages), DocsSchema::new().unwrap())
            .unwrap();
        registry.resolve(DOCS).unwrap()
    }

    fn site(sidebar: &str) -> SiteConfig {
        SiteConfig::parse(&format!("title: Hestia\nsidebar:\n{}", sidebar), "site.yaml").unwrap()
    }

    fn labels(items: &[NavItem]) -> Vec<&str> {
        items.iter().map(NavItem::label).collect()
    }

    #[test]
    fn test_explicit_links() {
        let docs = docs(vec![json!({"id": "guides/example", "title": "Example"})]);
        let site = site(
            "  - label: Guides\n    items:\n      - label: Example Guide\n        slug: guides/example\n      - guides/example\n",
        );

        let nav = resolve_sidebar(&site, &docs).unwrap();
        let NavItem::Group { items, .. } = &nav[0] else {
            panic!("expected a group");
        };
        assert_eq!(labels(items), vec!["Example Guide", "Example"]);
        assert!(matches!(&items[0], NavItem::Link { href, .. } if href == "/guides/example/"));
    }

    #[test]
    fn test_unknown_slug() {
        let docs = docs(vec![json!({"id": "guides/example", "title": "Example"})]);
        let err = resolve_sidebar(&site("  - guides/missing\n"), &docs).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownSlug { slug } if slug == "guides/missing"));
    }

    #[test]
    fn test_autogenerate_orders_and_nests() {
        let docs = docs(vec![
            json!({"id": "reference/zeta", "title": "Zeta"}),
            json!({"id": "reference/alpha", "title": "Alpha"}),
            json!({"id": "reference/numbers/natural", "title": "Natural", "sidebar": {"order": 1}}),
            json!({"id": "reference/last", "title": "Last", "sidebar": {"order": 5, "label": "Ordered"}}),
            json!({"id": "reference/first", "title": "First", "sidebar": {"order": 1}}),
            json!({"id": "reference/secret", "title": "Secret", "sidebar": {"hidden": true}}),
            json!({"id": "reference/wip", "title": "WIP", "draft": true}),
            json!({"id": "guides/example", "title": "Example"}),
        ]);
        let site = site("  - label: Reference\n    autogenerate:\n      directory: reference\n");

        let nav = resolve_sidebar(&site, &docs).unwrap();
        let NavItem::Group { items, .. } = &nav[0] else {
            panic!("expected a group");
        };
        assert_eq!(labels(items), vec!["First", "Ordered", "Alpha", "numbers", "Zeta"]);

        let NavItem::Group { items: nested, .. } = &items[3] else {
            panic!("expected a nested group");
        };
        assert_eq!(labels(nested), vec!["Natural"]);
    }

    #[test]
    fn test_base_prefix_and_badge() {
        let docs = docs(vec![
            json!({"id": "index", "title": "Home"}),
            json!({"id": "intro", "title": "Intro", "sidebar": {"badge": "New"}}),
        ]);
        let mut site = site("  - index\n  - intro\n");
        site.base = "/hestia/".to_string();

        let nav = resolve_sidebar(&site, &docs).unwrap();
        assert!(matches!(&nav[0], NavItem::Link { href, .. } if href == "/hestia/"));
        assert!(matches!(&nav[1], NavItem::Link { href, badge: Some(b), .. } if href == "/hestia/intro/" && b == "New"));
    }

    #[test]
    fn test_empty_autogenerate_directory() {
        let docs = docs(Vec::new());
        let site = site("  - label: Reference\n    autogenerate:\n      directory: reference\n");
        let nav = resolve_sidebar(&site, &docs).unwrap();
        assert!(matches!(&nav[0], NavItem::Group { items, .. } if items.is_empty()));
    }
}
