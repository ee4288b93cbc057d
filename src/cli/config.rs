//! Config command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use super::utils::load;
use super::GlobalArgs;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: Format,

    /// List the files that were loaded, highest priority first
    #[arg(long)]
    pub sources: bool,
}

pub fn run(global: &GlobalArgs, args: ConfigArgs) -> Result<()> {
    let loaded = load(global)?;

    if args.sources {
        if loaded.sources.is_empty() {
            println!("No config files found.");
        }
        for candidate in &loaded.sources {
            println!("{}\t{}", candidate.kind.label(), candidate.path.display());
        }
        return Ok(());
    }

    let config = &loaded.config;
    let content = match args.format {
        Format::Json => serde_json::to_string_pretty(config).context("Failed to serialize to JSON")?,
        Format::Yaml => serde_yaml::to_string(config).context("Failed to serialize to YAML")?,
        Format::Toml => toml::to_string_pretty(config).context("Failed to serialize to TOML")?,
    };
    println!("{}", content.trim_end());
    Ok(())
}
