//! Alias command implementation

use anyhow::{Context, Result};
use clap::Args;
use siterc::config::Value;
use siterc::AliasResolver;

use super::utils::load;
use super::GlobalArgs;

#[derive(Args)]
pub struct AliasArgs {
    /// Alias to describe (with or without the leading @); lists all aliases when omitted
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Print the complete record with defaults filled in
    #[arg(long)]
    pub full: bool,
}

pub fn run(global: &GlobalArgs, args: AliasArgs) -> Result<()> {
    let loaded = load(global)?;
    let resolver = AliasResolver::new(&loaded.config)?;

    let Some(name) = args.name else {
        let names = resolver.names();
        if names.is_empty() {
            println!("No site aliases defined.");
        }
        for name in names {
            println!("@{}", name);
        }
        return Ok(());
    };

    let alias = resolver.resolve(&name)?;

    if args.full {
        let mut wrapper = siterc::config::Map::new();
        wrapper.insert(alias.name().to_string(), Value::Table(alias.full_record()));
        let content = toml::to_string_pretty(&wrapper).context("Failed to serialize alias")?;
        println!("{}", content.trim_end());
        return Ok(());
    }

    println!("Alias: @{}", alias.name());
    println!("Location: {}", if alias.is_remote() { "remote" } else { "local" });
    if let Some(uri) = alias.uri() {
        println!("URI: {}", uri);
    }
    if alias.is_remote() {
        println!("SSH: {}", alias.ssh_destination()?);
    }
    if let Ok(db) = alias.database() {
        println!("Database: {}", db.masked_url());
    }
    let paths: Vec<&str> = alias.path_alias_names().collect();
    if !paths.is_empty() {
        println!("Path aliases:");
        for name in paths {
            match alias.resolve_path(name) {
                Ok(path) => println!("  %{}: {}", name, path.display()),
                Err(e) => println!("  %{}: ({})", name, e),
            }
        }
    }
    Ok(())
}
