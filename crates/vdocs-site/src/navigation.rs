//! Navigation tree keyed by route prefix.
//!
//! Each route prefix (a version segment such as `/2.0/` or a top-level
//! area such as `/guide/`) owns an ordered list of [`NavigationSection`]s.
//! The tree is built once from configuration and never mutated; the
//! rendering host reads it to draw sidebars.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display label.
    pub text: String,
    /// Target route path.
    pub link: String,
}

impl NavItem {
    /// Create a navigation entry.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }

    /// Whether the link points outside the site.
    pub fn is_external(&self) -> bool {
        self.link.contains("://") || self.link.starts_with("mailto:")
    }

    /// Link with any `#fragment` or `?query` removed.
    pub fn target_route(&self) -> &str {
        let end = self.link.find(['#', '?']).unwrap_or(self.link.len());
        &self.link[..end]
    }
}

/// Titled group of navigation entries.
///
/// `collapsible` and `collapsed` are independent flags: a section that is
/// not collapsible is always expanded, a collapsible one starts in the
/// state given by `collapsed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationSection {
    /// Section heading.
    pub title: String,
    /// Whether the reader can collapse the section.
    pub collapsible: bool,
    /// Initial state of a collapsible section.
    pub collapsed: bool,
    /// Entries in rendering order.
    pub items: Vec<NavItem>,
}

impl NavigationSection {
    /// Create an always-expanded section.
    pub fn new(title: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            title: title.into(),
            collapsible: false,
            collapsed: false,
            items,
        }
    }

    /// Make the section collapsible with the given initial state.
    #[must_use]
    pub fn collapsible(mut self, collapsed: bool) -> Self {
        self.collapsible = true;
        self.collapsed = collapsed;
        self
    }

    fn validate(&self, prefix: &str) -> Result<(), NavigationError> {
        let invalid = |message: String| NavigationError::Invalid {
            prefix: prefix.to_owned(),
            message,
        };

        if self.title.trim().is_empty() {
            return Err(invalid("section title cannot be empty".to_owned()));
        }
        if self.collapsed && !self.collapsible {
            return Err(invalid(format!(
                "section {:?} is collapsed but not collapsible",
                self.title
            )));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.text.trim().is_empty() {
                return Err(invalid(format!(
                    "item {i} in section {:?} has an empty label",
                    self.title
                )));
            }
            if item.link.trim().is_empty() {
                return Err(invalid(format!(
                    "item {:?} in section {:?} has an empty link",
                    item.text, self.title
                )));
            }
        }
        Ok(())
    }
}

/// Error returned when navigation configuration is malformed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    /// A section or item under `prefix` is malformed.
    #[error("invalid navigation under {prefix:?}: {message}")]
    Invalid {
        /// Route prefix the section is registered under.
        prefix: String,
        /// What is wrong.
        message: String,
    },
}

/// Navigation link whose target is not a known page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    /// Route prefix of the owning section.
    pub prefix: String,
    /// Title of the owning section.
    pub section: String,
    /// The offending entry.
    pub item: NavItem,
}

/// Immutable mapping from route prefix to navigation sections.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavigationTree {
    prefixes: HashMap<String, Vec<NavigationSection>>,
}

impl NavigationTree {
    /// Build a tree from `(prefix, sections)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Invalid`] for an empty prefix, a prefix
    /// given twice, or a malformed section.
    pub fn new<I, P>(entries: I) -> Result<Self, NavigationError>
    where
        I: IntoIterator<Item = (P, Vec<NavigationSection>)>,
        P: Into<String>,
    {
        let mut prefixes = HashMap::new();
        for (prefix, sections) in entries {
            let prefix = prefix.into();
            if prefix.is_empty() {
                return Err(NavigationError::Invalid {
                    prefix,
                    message: "route prefix cannot be empty".to_owned(),
                });
            }
            for section in &sections {
                section.validate(&prefix)?;
            }
            if prefixes.contains_key(&prefix) {
                return Err(NavigationError::Invalid {
                    prefix,
                    message: "route prefix is defined more than once".to_owned(),
                });
            }
            prefixes.insert(prefix, sections);
        }
        Ok(Self { prefixes })
    }

    /// Sections registered for exactly `prefix`.
    ///
    /// Unknown prefixes yield an empty slice; the host falls back to its
    /// default navigation for them.
    pub fn sections_for(&self, prefix: &str) -> &[NavigationSection] {
        self.prefixes
            .get(prefix)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sections for the longest registered prefix that `route_path` falls under.
    ///
    /// Prefixes match whole path segments: `/guide` covers `/guide` and
    /// `/guide/x` but not `/guidelines/x`. A route equal to a prefix without
    /// its trailing slash (`/2.0` for `/2.0/`) also falls under it.
    pub fn sections_for_route(&self, route_path: &str) -> Option<(&str, &[NavigationSection])> {
        self.prefixes
            .iter()
            .filter(|(prefix, _)| falls_under(route_path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, sections)| (prefix.as_str(), sections.as_slice()))
    }

    /// Registered prefixes, sorted.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.prefixes.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }

    /// Whether the tree has no prefixes.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Every `(prefix, section, item)` in the tree.
    pub fn links(&self) -> impl Iterator<Item = (&str, &NavigationSection, &NavItem)> {
        self.prefixes.iter().flat_map(|(prefix, sections)| {
            sections.iter().flat_map(move |section| {
                section
                    .items
                    .iter()
                    .map(move |item| (prefix.as_str(), section, item))
            })
        })
    }

    /// Internal links whose target route is not in `routes`.
    ///
    /// External links are skipped. Results are sorted by prefix, then link.
    pub fn dangling_links(&self, routes: &HashSet<&str>) -> Vec<DanglingLink> {
        let mut dangling: Vec<DanglingLink> = self
            .links()
            .filter(|(_, _, item)| !item.is_external() && !routes.contains(item.target_route()))
            .map(|(prefix, section, item)| DanglingLink {
                prefix: prefix.to_owned(),
                section: section.title.clone(),
                item: item.clone(),
            })
            .collect();
        dangling.sort_by(|a, b| (&a.prefix, &a.item.link).cmp(&(&b.prefix, &b.item.link)));
        dangling
    }
}

fn falls_under(route_path: &str, prefix: &str) -> bool {
    match route_path.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
        None => prefix.strip_suffix('/') == Some(route_path),
    }
}
