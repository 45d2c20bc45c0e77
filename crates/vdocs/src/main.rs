//! vdocs CLI - versioned documentation metadata.
//!
//! Provides commands for:
//! - `check`: Validate configuration and navigation against the docs
//! - `resolve`: Show the version tag and canonical URL of routes
//! - `pages`: Resolve every page of the docs and print a JSON manifest
//! - `nav`: Print the navigation sections of a route prefix

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, PagesArgs, ResolveArgs};
use output::Output;

/// vdocs - versioned documentation metadata.
#[derive(Parser)]
#[command(name = "vdocs", version, about)]
struct Cli {
    /// Enable verbose output (INFO logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and report navigation links without pages.
    Check(CheckArgs),
    /// Resolve version metadata for the given routes.
    Resolve(ResolveArgs),
    /// Resolve version metadata for every page in the source directory.
    Pages(PagesArgs),
    /// Print navigation sections for a route prefix.
    Nav(NavArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Pages(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
