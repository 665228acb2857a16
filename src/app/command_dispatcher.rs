//! CLI command routing: runs the `links` or `fetch` handler.

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::{ProcessExit, commands};

/// Runs the subcommand selected in `cli` and returns its exit outcome.
pub(crate) async fn dispatch(cli: &Cli) -> Result<ProcessExit> {
    match &cli.command {
        Command::Links(args) => commands::run_links_command(args).await,
        Command::Fetch(args) => commands::run_fetch_command(args).await,
    }
}
