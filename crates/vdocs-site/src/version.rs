//! Known documentation versions.
//!
//! [`VersionRegistry`] holds the ordered version identifiers of a site,
//! oldest first. The last identifier is the current version, which every
//! older version canonicalizes to.

use std::collections::HashSet;

use crate::navigation::NavItem;

/// Error returned when a version list cannot form a registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No versions configured.
    #[error("versions.list cannot be empty")]
    Empty,
    /// The same identifier appears more than once.
    #[error("duplicate version identifier: {0}")]
    Duplicate(String),
    /// Identifier is empty or cannot be a single path segment.
    #[error("invalid version identifier {0:?}: must be a non-empty path segment without '/'")]
    InvalidIdentifier(String),
}

/// Ordered, immutable list of known versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRegistry {
    versions: Vec<String>,
}

impl VersionRegistry {
    /// Create a registry from identifiers ordered oldest to newest.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the list is empty, has duplicates, or
    /// contains an identifier that is empty or contains `/`.
    pub fn new<I, S>(versions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        if versions.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(versions.len());
        for version in &versions {
            if version.is_empty() || version.contains('/') {
                return Err(RegistryError::InvalidIdentifier(version.clone()));
            }
            if !seen.insert(version.as_str()) {
                return Err(RegistryError::Duplicate(version.clone()));
            }
        }

        Ok(Self { versions })
    }

    /// All identifiers, oldest first.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// The current (newest) version.
    pub fn current(&self) -> &str {
        // Non-empty by construction.
        self.versions.last().map_or("", String::as_str)
    }

    /// Whether `version` is the current version.
    pub fn is_current(&self, version: &str) -> bool {
        self.current() == version
    }

    /// Find the version a route belongs to.
    ///
    /// Identifiers are tried in registry order and the first one that
    /// appears as a whole path segment of `route_path` wins. Segments are
    /// compared exactly, so `1.0` does not match `/11.0/` or `/v1.0/`.
    pub fn containing_version(&self, route_path: &str) -> Option<&str> {
        self.versions
            .iter()
            .find(|version| segment_position(route_path, version).is_some())
            .map(String::as_str)
    }

    /// Version switcher entries, newest first.
    ///
    /// Each entry links to the version's route prefix (`/1.0/`). The current
    /// version is labelled `(Current)`, older ones `(Legacy)`.
    pub fn switcher(&self) -> Vec<NavItem> {
        self.versions
            .iter()
            .rev()
            .map(|version| {
                let status = if self.is_current(version) { "Current" } else { "Legacy" };
                NavItem::new(format!("v{version} ({status})"), format!("/{version}/"))
            })
            .collect()
    }

    /// Dotted version string used as the search facet (`"2"` becomes `"2.0"`).
    pub fn search_version(version: &str) -> String {
        format!("{version}.0")
    }
}

/// Byte range of the first path segment of `path` equal to `segment`.
pub(crate) fn segment_position(path: &str, segment: &str) -> Option<(usize, usize)> {
    let mut start = 0;
    for part in path.split('/') {
        let end = start + part.len();
        if part == segment {
            return Some((start, end));
        }
        start = end + 1;
    }
    None
}
