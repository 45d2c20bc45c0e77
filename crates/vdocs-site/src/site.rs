//! Site-wide build configuration.
//!
//! [`Site`] bundles the immutable pieces a build needs (the canonical URL
//! resolver with its version registry, and the navigation tree) and runs
//! the metadata step over a batch of pages.
//!
//! # Thread Safety
//!
//! `Site` holds no mutable state. Pages are resolved in parallel, each
//! worker mutating only the page it was handed.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::canonical::{CanonicalResolver, Resolution, ResolveError};
use crate::navigation::{DanglingLink, NavigationSection, NavigationTree};
use crate::page::Page;
use crate::version::VersionRegistry;

/// Outcome of resolving a batch of pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    /// Pages that received a version tag and canonical URL.
    pub versioned: usize,
    /// Pages outside every known version.
    pub unversioned: usize,
}

/// Immutable build configuration shared by every page.
#[derive(Clone, Debug)]
pub struct Site {
    resolver: CanonicalResolver,
    navigation: NavigationTree,
}

impl Site {
    /// Create a site from its resolver and navigation tree.
    pub fn new(resolver: CanonicalResolver, navigation: NavigationTree) -> Self {
        Self {
            resolver,
            navigation,
        }
    }

    /// Canonical URL resolver.
    pub fn resolver(&self) -> &CanonicalResolver {
        &self.resolver
    }

    /// Version registry.
    pub fn registry(&self) -> &VersionRegistry {
        self.resolver.registry()
    }

    /// Navigation tree.
    pub fn navigation(&self) -> &NavigationTree {
        &self.navigation
    }

    /// Navigation sections that apply to `page`, with the matched prefix.
    pub fn sections_for_page(&self, page: &Page) -> Option<(&str, &[NavigationSection])> {
        self.navigation.sections_for_route(&page.route_path)
    }

    /// Run the metadata step on one page.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] naming the page route on failure.
    pub fn resolve_page(&self, page: &mut Page) -> Result<Option<Resolution>, ResolveError> {
        self.resolver
            .resolve(&page.route_path, &mut page.frontmatter)
    }

    /// Run the metadata step on every page in parallel.
    ///
    /// Stops at the first failing page; pages processed before the failure
    /// keep their metadata.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] of a failing page.
    pub fn resolve_pages(&self, pages: &mut [Page]) -> Result<ResolveSummary, ResolveError> {
        let resolved = pages
            .par_iter_mut()
            .map(|page| self.resolve_page(page).map(|r| r.is_some()))
            .collect::<Result<Vec<bool>, _>>()?;

        let versioned = resolved.iter().filter(|&&v| v).count();
        let summary = ResolveSummary {
            versioned,
            unversioned: resolved.len() - versioned,
        };
        tracing::info!(
            versioned = summary.versioned,
            unversioned = summary.unversioned,
            current = self.registry().current(),
            "Resolved page metadata"
        );
        Ok(summary)
    }

    /// Navigation links that do not point at any of `pages`.
    pub fn dangling_links(&self, pages: &[Page]) -> Vec<DanglingLink> {
        let routes: HashSet<&str> = pages.iter().map(|p| p.route_path.as_str()).collect();
        let dangling = self.navigation.dangling_links(&routes);
        for link in &dangling {
            tracing::warn!(
                prefix = %link.prefix,
                section = %link.section,
                link = %link.item.link,
                "Navigation link has no matching page"
            );
        }
        dangling
    }
}
