//! Shared CLI utilities.

use anyhow::Result;
use siterc::config::{ConfigLoader, Loaded, ParsePolicy, SearchPath};

use super::GlobalArgs;

/// Build a loader from the global flags and run it.
pub fn load(global: &GlobalArgs) -> Result<Loaded> {
    let search = SearchPath::from_env()
        .target_dir(global.site_dir.clone())
        .install_root(global.root.clone());

    let policy = if global.strict { ParsePolicy::Abort } else { ParsePolicy::Skip };
    let loaded = ConfigLoader::new(search)
        .explicit(global.config.clone())
        .policy(policy)
        .environment(!global.no_env)
        .load()?;
    Ok(loaded)
}
