//! `vdocs pages` command implementation.

use clap::Args;
use serde::Serialize;
use vdocs_site::{Page, ResolveSummary, Scanner};

use super::{ConfigArgs, site_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

/// JSON manifest printed by the pages command.
#[derive(Serialize)]
struct PagesManifest {
    /// Version the canonical URLs point at.
    current: String,
    /// Resolution counts.
    summary: ResolveSummary,
    /// Every page with its resolved frontmatter.
    pages: Vec<Page>,
}

impl PagesArgs {
    /// Execute the pages command.
    ///
    /// Scans the source directory, resolves every page and prints a JSON
    /// manifest of routes and frontmatter.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let site = site_from_config(&config)?;

        let mut pages = Scanner::new(&config.site_resolved.source_dir).scan()?;
        let summary = site.resolve_pages(&mut pages)?;

        Output::new().json(&PagesManifest {
            current: site.registry().current().to_owned(),
            summary,
            pages,
        })
    }
}
