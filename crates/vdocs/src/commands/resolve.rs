//! `vdocs resolve` command implementation.

use clap::Args;
use vdocs_site::Page;

use super::{ConfigArgs, site_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Route paths to resolve (e.g. /1.0/installation).
    #[arg(required = true)]
    routes: Vec<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// Prints each route with the frontmatter it would receive.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let site = site_from_config(&config)?;

        let mut pages: Vec<Page> = self.routes.into_iter().map(Page::new).collect();
        site.resolve_pages(&mut pages)?;

        Output::new().json(&pages)
    }
}
