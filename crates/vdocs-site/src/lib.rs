//! Versioned documentation metadata for vdocs.
//!
//! This crate provides:
//! - [`VersionRegistry`]: known versions, oldest first, newest is current
//! - [`CanonicalResolver`]: per-page version tag and canonical URL
//! - [`NavigationTree`]: navigation sections keyed by route prefix
//! - [`Site`]: the above bundled for a build, with batch resolution
//! - [`Scanner`]: page discovery from a markdown source directory
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vdocs_site::{CanonicalResolver, NavigationTree, Page, Site, VersionRegistry};
//!
//! let registry = VersionRegistry::new(["1.0", "2.0"])?;
//! let resolver = CanonicalResolver::new(registry, "/docs/")?;
//! let site = Site::new(resolver, NavigationTree::default());
//!
//! let mut pages = vec![Page::new("/1.0/installation"), Page::new("/about")];
//! site.resolve_pages(&mut pages)?;
//!
//! assert_eq!(pages[0].frontmatter.canonical_url(), Some("docs/2.0/installation"));
//! assert_eq!(pages[1].frontmatter.canonical_url(), None);
//! # Ok(())
//! # }
//! ```

mod canonical;
mod frontmatter;
mod navigation;
mod page;
mod scanner;
mod site;
mod version;

pub use canonical::{CanonicalResolver, Resolution, ResolveError, VERSION_META_NAME};
pub use frontmatter::{CANONICAL_URL_KEY, Frontmatter, FrontmatterError, META_KEY, MetaTag};
pub use navigation::{DanglingLink, NavItem, NavigationError, NavigationSection, NavigationTree};
pub use page::Page;
pub use scanner::{ScanError, Scanner, route_for_file};
pub use site::{ResolveSummary, Site};
pub use version::{RegistryError, VersionRegistry};
