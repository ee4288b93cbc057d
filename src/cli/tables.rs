//! Tables command implementation

use anyhow::Result;
use clap::Args;
use siterc::config::{SkipTableSet, SKIP_TABLES, STRUCTURE_TABLES};

use super::utils::load;
use super::GlobalArgs;

#[derive(Args)]
pub struct TablesArgs {
    /// Tags whose tables are omitted entirely (comma-separated)
    #[arg(long, value_name = "TAGS")]
    pub skip_key: Option<String>,

    /// Tags whose tables keep structure but lose data (comma-separated)
    #[arg(long, value_name = "TAGS")]
    pub structure_key: Option<String>,
}

pub fn run(global: &GlobalArgs, args: TablesArgs) -> Result<()> {
    let loaded = load(global)?;
    let skip = SkipTableSet::from_config(&loaded.config, SKIP_TABLES)?;
    let structure = SkipTableSet::from_config(&loaded.config, STRUCTURE_TABLES)?;

    if args.skip_key.is_none() && args.structure_key.is_none() {
        for (label, set) in [(SKIP_TABLES, &skip), (STRUCTURE_TABLES, &structure)] {
            let tags: Vec<&str> = set.tags().collect();
            println!("{}: {}", label, tags.join(", "));
        }
        return Ok(());
    }

    if let Some(keys) = &args.skip_key {
        let tables: Vec<String> = skip.select(keys).into_iter().collect();
        println!("{}: {}", SKIP_TABLES, tables.join(","));
    }
    if let Some(keys) = &args.structure_key {
        let tables: Vec<String> = structure.select(keys).into_iter().collect();
        println!("{}: {}", STRUCTURE_TABLES, tables.join(","));
    }
    Ok(())
}
