//! Page discovery by filesystem walking.
//!
//! Discovery is split in two phases: walking the source directory to find
//! markdown files, then reading each file and parsing its frontmatter.
//! The second phase runs in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::frontmatter::{Frontmatter, FrontmatterError};
use crate::page::Page;

/// Error returned when the source directory cannot be turned into pages.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading a file or directory.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Frontmatter of a file is malformed.
    #[error("{}: {source}", path.display())]
    Frontmatter {
        /// Offending file, relative to the source directory.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: FrontmatterError,
    },
}

/// Markdown file found during the walk.
#[derive(Debug)]
struct PageRef {
    route_path: String,
    relative_path: PathBuf,
}

/// Discovers pages under a source directory.
pub struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    /// Create a scanner rooted at `source_dir`.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Walk the source directory and load every page, sorted by route.
    ///
    /// Hidden files and directories are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the directory is missing, a file cannot be
    /// read, or a frontmatter block is malformed.
    pub fn scan(&self) -> Result<Vec<Page>, ScanError> {
        if !self.source_dir.is_dir() {
            return Err(ScanError::NotFound(self.source_dir.clone()));
        }

        let mut refs = Vec::new();
        Self::walk(&self.source_dir, Path::new(""), &mut refs)?;

        let mut pages = refs
            .into_par_iter()
            .map(|page_ref| self.load(page_ref))
            .collect::<Result<Vec<_>, _>>()?;
        pages.sort_by(|a, b| a.route_path.cmp(&b.route_path));

        tracing::info!(
            source_dir = %self.source_dir.display(),
            pages = pages.len(),
            "Scanned pages"
        );
        Ok(pages)
    }

    fn walk(dir: &Path, relative: &Path, refs: &mut Vec<PageRef>) -> Result<(), ScanError> {
        let io_err = |source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let child = relative.join(&name);
            let is_dir = entry.file_type().map_err(io_err)?.is_dir();
            if is_dir {
                Self::walk(&entry.path(), &child, refs)?;
            } else if child.extension().is_some_and(|e| e == "md") {
                refs.push(PageRef {
                    route_path: route_for_file(&child),
                    relative_path: child,
                });
            }
        }
        Ok(())
    }

    fn load(&self, page_ref: PageRef) -> Result<Page, ScanError> {
        let full_path = self.source_dir.join(&page_ref.relative_path);
        let content = fs::read_to_string(&full_path).map_err(|source| ScanError::Io {
            path: full_path,
            source,
        })?;

        let (yaml, _body) = Frontmatter::split(&content);
        let frontmatter = Frontmatter::from_yaml(yaml.unwrap_or_default()).map_err(|source| {
            ScanError::Frontmatter {
                path: page_ref.relative_path.clone(),
                source,
            }
        })?;

        Ok(Page {
            route_path: page_ref.route_path,
            frontmatter,
            source_path: Some(page_ref.relative_path),
        })
    }
}

/// Convert a markdown path relative to the docs root into a route path.
///
/// `index.md` maps to its directory with a trailing slash; other files
/// drop the `.md` extension. Path components are joined with `/`.
pub fn route_for_file(rel_path: &Path) -> String {
    let parts: Vec<String> = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let Some((file, dirs)) = parts.split_last() else {
        return "/".to_owned();
    };

    let mut route = String::from("/");
    for dir in dirs {
        route.push_str(dir);
        route.push('/');
    }

    let stem = file.strip_suffix(".md").unwrap_or(file);
    if stem != "index" {
        route.push_str(stem);
    }
    route
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_route_for_file() {
        assert_eq!(route_for_file(Path::new("index.md")), "/");
        assert_eq!(route_for_file(Path::new("about.md")), "/about");
        assert_eq!(route_for_file(Path::new("2.0/index.md")), "/2.0/");
        assert_eq!(
            route_for_file(Path::new("2.0/guide/installation.md")),
            "/2.0/guide/installation"
        );
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Home\n");
        write(
            root,
            "1.0/installation.md",
            "---\ntitle: Installation\n---\n# Installation\n",
        );
        write(root, "2.0/index.md", "# 2.0\n");
        write(root, "2.0/notes.txt", "not a page");
        write(root, ".vitepress/config.md", "# hidden\n");

        let pages = Scanner::new(root).scan().unwrap();

        let routes: Vec<&str> = pages.iter().map(|p| p.route_path.as_str()).collect();
        assert_eq!(routes, vec!["/", "/1.0/installation", "/2.0/"]);

        let install = &pages[1];
        assert_eq!(install.frontmatter.get("title"), Some(&json!("Installation")));
        assert_eq!(
            install.source_path.as_deref(),
            Some(Path::new("1.0/installation.md"))
        );
        assert!(pages[0].frontmatter.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scanner::new(dir.path().join("missing")).scan().unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }

    #[test]
    fn test_scan_reports_bad_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guide/setup.md", "---\ntitle: [broken\n---\n");

        let err = Scanner::new(dir.path()).scan().unwrap_err();

        assert!(matches!(err, ScanError::Frontmatter { .. }));
        assert!(err.to_string().contains("setup.md"));
    }
}
