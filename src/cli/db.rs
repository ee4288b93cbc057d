//! Db command implementation

use anyhow::Result;
use clap::Args;
use siterc::AliasResolver;

use super::utils::load;
use super::GlobalArgs;

#[derive(Args)]
pub struct DbArgs {
    /// Alias whose database settings are shown
    #[arg(value_name = "ALIAS")]
    pub alias: String,
}

pub fn run(global: &GlobalArgs, args: DbArgs) -> Result<()> {
    let loaded = load(global)?;
    let resolver = AliasResolver::new(&loaded.config)?;
    let alias = resolver.resolve(&args.alias)?;
    let db = alias.database()?;

    println!("URL: {}", db.masked_url());
    println!("Driver: {}", db.driver);
    println!("Database: {}", db.database);
    if let Some(host) = &db.host {
        println!("Host: {}", host);
    }
    if let Some(port) = db.port {
        println!("Port: {}", port);
    }
    if let Some(user) = &db.username {
        println!("User: {}", user);
    }
    if alias.is_remote() {
        if let Some(remote_port) = db.remote_port {
            println!("Remote port: {}", remote_port);
        }
    }
    Ok(())
}
