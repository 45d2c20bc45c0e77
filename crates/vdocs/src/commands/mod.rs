//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod pages;
pub(crate) mod resolve;

use std::path::PathBuf;

use clap::Args;
use vdocs_config::{CliSettings, Config, NavSectionConfig};
use vdocs_site::{CanonicalResolver, NavItem, NavigationSection, NavigationTree, Site, VersionRegistry};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use pages::PagesArgs;
pub(crate) use resolve::ResolveArgs;

/// Arguments shared by every command that loads the site configuration.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover vdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site base path (overrides config).
    #[arg(long, env = "VDOCS_BASE_PATH")]
    base_path: Option<String>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load and validate configuration, applying CLI overrides.
    pub(crate) fn load(self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            base_path: self.base_path,
            source_dir: self.source_dir,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the immutable site model from loaded configuration.
///
/// Fails on an empty or malformed version list and on malformed
/// navigation, before any page is touched.
pub(crate) fn site_from_config(config: &Config) -> Result<Site, CliError> {
    let registry = VersionRegistry::new(config.versions.list.iter().cloned())?;
    let resolver = CanonicalResolver::new(registry, config.site_resolved.base_path.clone())?;
    let navigation = NavigationTree::new(
        config
            .navigation
            .iter()
            .map(|(prefix, sections)| {
                let sections = sections.iter().map(section_from_config).collect::<Vec<_>>();
                (prefix.clone(), sections)
            }),
    )?;

    tracing::info!(
        versions = config.versions.list.len(),
        current = resolver.registry().current(),
        base_path = resolver.base_path(),
        nav_prefixes = navigation.prefixes().len(),
        "Loaded site configuration"
    );
    Ok(Site::new(resolver, navigation))
}

fn section_from_config(section: &NavSectionConfig) -> NavigationSection {
    NavigationSection {
        title: section.title.clone(),
        collapsible: section.is_collapsible(),
        collapsed: section.is_collapsed(),
        items: section
            .items
            .iter()
            .map(|item| NavItem::new(item.text.clone(), item.link.clone()))
            .collect(),
    }
}
