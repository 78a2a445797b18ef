//! shardcache - command-line front end for the filesystem cache
//!
//! Thin wrapper over the `shardcache` library: parses arguments, sets up logging
//! on stderr and dispatches to `Cache` operations.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    cli::run(cli)
}

/// Log to stderr; `RUST_LOG` takes precedence over `--quiet` / `--verbose`
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "shardcache=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
