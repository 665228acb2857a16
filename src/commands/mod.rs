//! CLI command handlers.

mod fetch;
mod links;

pub use fetch::run_fetch_command;
pub use links::run_links_command;
