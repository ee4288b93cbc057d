//! Command-line interface for siterc
//!
//! Provides `config`, `alias`, `tables`, `target` and `db` subcommands over the
//! merged configuration.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod alias;
mod config;
mod db;
mod tables;
mod target;
mod utils;

/// Inspect merged site configuration and resolve site aliases
#[derive(Parser)]
#[command(name = "siterc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Load only this config file; no other location is searched
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Site-specific directory searched first for siterc files
    #[arg(long, value_name = "DIR", global = true)]
    pub site_dir: Option<PathBuf>,

    /// Installation root searched after the site directory
    #[arg(short = 'r', long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Fail instead of skipping a malformed config file
    #[arg(long, global = true)]
    pub strict: bool,

    /// Ignore SITERC_* environment variables
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged configuration
    Config(config::ConfigArgs),

    /// List site aliases or describe one
    Alias(alias::AliasArgs),

    /// Print skip / structure table lists for the given tags
    Tables(tables::TablesArgs),

    /// Print the rsync target for @alias[:%path-alias[/sub/path]]
    Target(target::TargetArgs),

    /// Print the database connection of an alias
    Db(db::DbArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.global.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Config(args) => config::run(&cli.global, args),
        Commands::Alias(args) => alias::run(&cli.global, args),
        Commands::Tables(args) => tables::run(&cli.global, args),
        Commands::Target(args) => target::run(&cli.global, args),
        Commands::Db(args) => db::run(&cli.global, args),
    }
}
