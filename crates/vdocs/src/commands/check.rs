//! `vdocs check` command implementation.

use clap::Args;
use vdocs_site::Scanner;

use super::{ConfigArgs, site_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Fail when a navigation link has no matching page.
    #[arg(long)]
    strict: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Validates configuration, scans the source directory, runs the
    /// metadata step on every page without writing anything, and reports
    /// navigation links without a page.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.config.load()?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        let site = site_from_config(&config)?;
        output.info(&format!(
            "Versions: {} (current: {})",
            site.registry().versions().join(", "),
            site.registry().current()
        ));
        output.info(&format!("Base path: {}", site.resolver().base_path()));

        let mut pages = Scanner::new(&config.site_resolved.source_dir).scan()?;
        let summary = site.resolve_pages(&mut pages)?;
        output.info(&format!(
            "Pages: {} versioned, {} unversioned",
            summary.versioned, summary.unversioned
        ));

        let dangling = site.dangling_links(&pages);
        for link in &dangling {
            output.warning(&format!(
                "{} > {}: \"{}\" links to missing page {}",
                link.prefix, link.section, link.item.text, link.item.link
            ));
        }

        if self.strict && !dangling.is_empty() {
            return Err(CliError::Validation(format!(
                "{} navigation link(s) point to missing pages",
                dangling.len()
            )));
        }

        output.success("Configuration OK");
        Ok(())
    }
}
