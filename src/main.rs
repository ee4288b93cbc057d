//! siterc: inspect merged site configuration and site aliases
//!
//! Finds siterc files in the site directory, installation root, home
//! directory and tool directory, merges them, and resolves site aliases.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
