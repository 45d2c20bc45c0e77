//! Page record handed over by the rendering host.

use std::path::PathBuf;

use serde::Serialize;

use crate::frontmatter::Frontmatter;

/// A documentation page: its route and its frontmatter.
///
/// The rendering host owns pages. Metadata extensions only read the route
/// and extend the frontmatter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    /// URL path with a leading slash (e.g. `/2.0/installation`, `/guide/`).
    #[serde(rename = "path")]
    pub route_path: String,
    /// Page frontmatter.
    pub frontmatter: Frontmatter,
    /// Source file relative to the docs root, if the page came from disk.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Page {
    /// Create a page with empty frontmatter.
    pub fn new(route_path: impl Into<String>) -> Self {
        Self::with_frontmatter(route_path, Frontmatter::new())
    }

    /// Create a page with the given frontmatter.
    pub fn with_frontmatter(route_path: impl Into<String>, frontmatter: Frontmatter) -> Self {
        Self {
            route_path: route_path.into(),
            frontmatter,
            source_path: None,
        }
    }
}
