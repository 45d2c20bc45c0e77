//! `vdocs nav` command implementation.

use clap::Args;
use serde::Serialize;
use vdocs_site::{NavItem, NavigationSection, Site};

use super::{ConfigArgs, site_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Route prefix to look up (e.g. /2.0/).
    prefix: String,

    /// Treat the argument as a page route and pick the longest matching prefix.
    #[arg(long)]
    route: bool,
}

/// JSON printed by the nav command.
#[derive(Debug, Serialize)]
struct NavResponse<'a> {
    /// Matched prefix, `None` if nothing matched.
    prefix: Option<&'a str>,
    /// Sections in rendering order.
    sections: &'a [NavigationSection],
    /// Version switcher entries, newest first.
    versions: Vec<NavItem>,
}

impl NavArgs {
    /// Execute the nav command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let site = site_from_config(&config)?;
        Output::new().json(&nav_response(&site, &self.prefix, self.route))
    }
}

fn nav_response<'a>(site: &'a Site, query: &'a str, by_route: bool) -> NavResponse<'a> {
    let navigation = site.navigation();
    let (prefix, sections) = if by_route {
        match navigation.sections_for_route(query) {
            Some((prefix, sections)) => (Some(prefix), sections),
            None => (None, &[][..]),
        }
    } else {
        let sections = navigation.sections_for(query);
        ((!sections.is_empty()).then_some(query), sections)
    };

    NavResponse {
        prefix,
        sections,
        versions: site.registry().switcher(),
    }
}
