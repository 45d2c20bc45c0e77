//! Canonical URL resolution for versioned pages.
//!
//! [`CanonicalResolver`] runs once per page while the site is being built.
//! For a page that lives under a known version it stamps two things into
//! the page frontmatter:
//!
//! - a `docsearch:version` meta tag so search results can be faceted by
//!   version;
//! - a `canonicalUrl` pointing at the same page in the current version.
//!
//! Pages outside every version are left untouched.
//!
//! # Example
//!
//! ```
//! use vdocs_site::{CanonicalResolver, Frontmatter, VersionRegistry};
//!
//! let registry = VersionRegistry::new(["1.0", "2.0"]).unwrap();
//! let resolver = CanonicalResolver::new(registry, "/docs/").unwrap();
//!
//! let mut frontmatter = Frontmatter::new();
//! resolver.resolve("/1.0/installation", &mut frontmatter).unwrap();
//! assert_eq!(frontmatter.canonical_url(), Some("docs/2.0/installation"));
//! ```

use serde::Serialize;

use crate::frontmatter::{Frontmatter, FrontmatterError, MetaTag};
use crate::version::{VersionRegistry, segment_position};

/// Name of the meta tag carrying the page version.
pub const VERSION_META_NAME: &str = "docsearch:version";

/// Error returned when a page's metadata cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Configured base path is unusable.
    #[error("invalid base path {0:?}: must be non-empty")]
    InvalidBasePath(String),
    /// Page frontmatter cannot be extended.
    #[error("cannot resolve metadata for {route_path}: {source}")]
    Frontmatter {
        /// Route of the offending page.
        route_path: String,
        /// Underlying frontmatter problem.
        #[source]
        source: FrontmatterError,
    },
    /// Matched version segment could not be located for rewriting.
    #[error("cannot resolve metadata for {route_path}: version segment {version:?} not found")]
    MissingSegment {
        /// Route of the offending page.
        route_path: String,
        /// Version that was matched.
        version: String,
    },
}

/// Metadata computed for a versioned page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Version the page belongs to.
    pub version: String,
    /// Version meta tag to stamp.
    pub meta: MetaTag,
    /// Site-relative canonical URL without a leading slash.
    pub canonical_url: String,
}

/// Computes version tags and canonical URLs for pages.
#[derive(Clone, Debug)]
pub struct CanonicalResolver {
    registry: VersionRegistry,
    base_path: String,
}

impl CanonicalResolver {
    /// Create a resolver for `registry` under `base_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidBasePath`] if `base_path` is empty.
    pub fn new(registry: VersionRegistry, base_path: impl Into<String>) -> Result<Self, ResolveError> {
        let base_path = base_path.into();
        if base_path.trim().is_empty() {
            return Err(ResolveError::InvalidBasePath(base_path));
        }
        Ok(Self {
            registry,
            base_path,
        })
    }

    /// Version registry in use.
    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Site base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Compute the metadata for `route_path` without touching any page.
    ///
    /// Returns `Ok(None)` for routes outside every known version.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingSegment`] if the matched version
    /// segment cannot be found again while rewriting.
    pub fn resolution_for(&self, route_path: &str) -> Result<Option<Resolution>, ResolveError> {
        let Some(version) = self.registry.containing_version(route_path) else {
            return Ok(None);
        };

        let (start, end) =
            segment_position(route_path, version).ok_or_else(|| ResolveError::MissingSegment {
                route_path: route_path.to_owned(),
                version: version.to_owned(),
            })?;
        let rewritten = format!(
            "{}{}{}",
            &route_path[..start],
            self.registry.current(),
            &route_path[end..]
        );

        Ok(Some(Resolution {
            version: version.to_owned(),
            meta: MetaTag::new(VERSION_META_NAME, VersionRegistry::search_version(version)),
            canonical_url: site_relative(&self.base_path, &rewritten),
        }))
    }

    /// Stamp version metadata into `frontmatter`.
    ///
    /// Running this twice on the same page leaves a single version tag.
    /// Either both the tag and the canonical URL are written or, on error,
    /// neither is.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] naming `route_path` if the frontmatter
    /// `meta` key is not a list or the route cannot be rewritten.
    pub fn resolve(
        &self,
        route_path: &str,
        frontmatter: &mut Frontmatter,
    ) -> Result<Option<Resolution>, ResolveError> {
        let Some(resolution) = self.resolution_for(route_path)? else {
            tracing::trace!(route_path, "No version segment, skipping");
            return Ok(None);
        };

        frontmatter
            .upsert_meta_tag(&resolution.meta)
            .map_err(|source| ResolveError::Frontmatter {
                route_path: route_path.to_owned(),
                source,
            })?;
        frontmatter.set_canonical_url(resolution.canonical_url.clone());

        tracing::debug!(
            route_path,
            version = %resolution.version,
            canonical_url = %resolution.canonical_url,
            "Resolved canonical URL"
        );
        Ok(Some(resolution))
    }
}

/// Join `base_path` and `route_path` with one separator and drop the leading `/`.
fn site_relative(base_path: &str, route_path: &str) -> String {
    let joined = format!(
        "{}/{}",
        base_path.trim_end_matches('/'),
        route_path.trim_start_matches('/')
    );
    match joined.strip_prefix('/') {
        Some(relative) => relative.to_owned(),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::frontmatter::META_KEY;

    fn resolver(versions: &[&str], base_path: &str) -> CanonicalResolver {
        let registry = VersionRegistry::new(versions.iter().copied()).unwrap();
        CanonicalResolver::new(registry, base_path).unwrap()
    }

    fn version_tags(frontmatter: &Frontmatter) -> Vec<MetaTag> {
        frontmatter
            .meta_tags()
            .into_iter()
            .filter(|tag| tag.name == VERSION_META_NAME)
            .collect()
    }

    #[test]
    fn test_current_version_page_keeps_its_path() {
        let resolver = resolver(&["1.0"], "/docs/");
        let mut fm = Frontmatter::new();

        resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm.canonical_url(), Some("docs/1.0/installation"));
        assert_eq!(
            version_tags(&fm),
            vec![MetaTag::new("docsearch:version", "1.0.0")]
        );
    }

    #[test]
    fn test_legacy_page_points_at_current() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();

        let resolution = resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm.canonical_url(), Some("docs/2.0/installation"));
        assert_eq!(
            version_tags(&fm),
            vec![MetaTag::new("docsearch:version", "1.0.0")]
        );
        assert_eq!(resolution.unwrap().version, "1.0");
    }

    #[test]
    fn test_unversioned_page_untouched() {
        let resolver = resolver(&["1.0"], "/docs/");
        let mut fm = Frontmatter::new();
        fm.insert("title", json!("Quick start"));
        let before = fm.clone();

        let resolution = resolver.resolve("/guide/quick-start", &mut fm).unwrap();

        assert!(resolution.is_none());
        assert_eq!(fm, before);
        assert!(!fm.contains_key(META_KEY));
        assert_eq!(fm.canonical_url(), None);
    }

    #[test]
    fn test_first_registry_match_wins() {
        let resolver = resolver(&["1.0", "2.0", "3.0"], "/docs/");
        let mut fm = Frontmatter::new();

        resolver
            .resolve("/2.0/upgrading/from/1.0/", &mut fm)
            .unwrap();

        // 1.0 is first in the registry, so only its segment is rewritten.
        assert_eq!(fm.canonical_url(), Some("docs/2.0/upgrading/from/3.0/"));
        assert_eq!(
            version_tags(&fm),
            vec![MetaTag::new("docsearch:version", "1.0.0")]
        );
    }

    #[test]
    fn test_only_first_occurrence_rewritten() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();

        resolver
            .resolve("/1.0/changelog/1.0/", &mut fm)
            .unwrap();

        assert_eq!(fm.canonical_url(), Some("docs/2.0/changelog/1.0/"));
    }

    #[test]
    fn test_root_base_path() {
        let resolver = resolver(&["1.0", "2.0"], "/");
        let mut fm = Frontmatter::new();

        resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm.canonical_url(), Some("2.0/installation"));
    }

    #[test]
    fn test_base_path_without_trailing_slash() {
        let resolver = resolver(&["1.0", "2.0"], "/docs");
        let mut fm = Frontmatter::new();

        resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm.canonical_url(), Some("docs/2.0/installation"));
    }

    #[test]
    fn test_resolve_twice_keeps_single_tag() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();

        resolver.resolve("/1.0/installation", &mut fm).unwrap();
        let first = fm.clone();
        resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm, first);
        assert_eq!(version_tags(&fm).len(), 1);
    }

    #[test]
    fn test_resolve_drops_duplicate_version_tags() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();
        fm.insert(
            META_KEY,
            json!([
                { "name": "docsearch:version", "content": "x" },
                { "name": "docsearch:version", "content": "y" }
            ]),
        );

        resolver.resolve("/1.0/a", &mut fm).unwrap();

        assert_eq!(
            version_tags(&fm),
            vec![MetaTag::new("docsearch:version", "1.0.0")]
        );
    }

    #[test]
    fn test_existing_meta_entries_preserved() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();
        fm.insert("title", json!("Installation"));
        fm.insert(META_KEY, json!([{ "name": "robots", "content": "noindex" }]));

        resolver.resolve("/1.0/installation", &mut fm).unwrap();

        assert_eq!(fm.get("title"), Some(&json!("Installation")));
        assert_eq!(
            fm.meta_tags(),
            vec![
                MetaTag::new("robots", "noindex"),
                MetaTag::new("docsearch:version", "1.0.0"),
            ]
        );
    }

    #[test]
    fn test_invalid_meta_fails_without_partial_write() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");
        let mut fm = Frontmatter::new();
        fm.insert(META_KEY, json!({ "robots": "noindex" }));
        let before = fm.clone();

        let err = resolver.resolve("/1.0/installation", &mut fm).unwrap_err();

        assert!(matches!(err, ResolveError::Frontmatter { .. }));
        assert!(err.to_string().contains("/1.0/installation"));
        assert_eq!(fm, before);
        assert_eq!(fm.canonical_url(), None);
    }

    #[test]
    fn test_empty_base_path_rejected() {
        let registry = VersionRegistry::new(["1.0"]).unwrap();
        let err = CanonicalResolver::new(registry, "").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidBasePath(_)));
    }

    #[test]
    fn test_resolution_for_is_pure() {
        let resolver = resolver(&["1.0", "2.0"], "/docs/");

        let resolution = resolver.resolution_for("/1.0/a").unwrap().unwrap();

        assert_eq!(
            resolution,
            Resolution {
                version: "1.0".to_owned(),
                meta: MetaTag::new("docsearch:version", "1.0.0"),
                canonical_url: "docs/2.0/a".to_owned(),
            }
        );
        assert!(resolver.resolution_for("/about").unwrap().is_none());
    }

    #[test]
    fn test_resolution_serializes_camel_case() {
        let resolver = resolver(&["1.0"], "/");
        let resolution = resolver.resolution_for("/1.0/a").unwrap().unwrap();
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["canonicalUrl"], "1.0/a");
        assert_eq!(json["meta"]["content"], "1.0.0");
    }

    #[test]
    fn test_site_relative() {
        assert_eq!(site_relative("/docs/", "/1.0/a"), "docs/1.0/a");
        assert_eq!(site_relative("/", "/1.0/a"), "1.0/a");
        assert_eq!(site_relative("/docs/", "1.0/a"), "docs/1.0/a");
    }
}
