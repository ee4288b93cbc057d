//! Target command implementation

use anyhow::Result;
use clap::Args;
use siterc::alias::SiteTarget;
use siterc::AliasResolver;

use super::utils::load;
use super::GlobalArgs;

#[derive(Args)]
pub struct TargetArgs {
    /// Target such as @stage, @stage:%files or @stage:%files/images
    #[arg(value_name = "SPEC")]
    pub spec: String,

    /// Require the alias to be on a remote host
    #[arg(long)]
    pub remote: bool,
}

pub fn run(global: &GlobalArgs, args: TargetArgs) -> Result<()> {
    let Some(target) = SiteTarget::parse(&args.spec) else {
        anyhow::bail!("Invalid target specification: '{}'", args.spec);
    };

    let loaded = load(global)?;
    let resolver = AliasResolver::new(&loaded.config)?;
    let alias = resolver.resolve(&target.alias)?;

    if args.remote {
        alias.require_remote("sync to a remote target")?;
    }

    println!("{}", alias.rsync_target(&target.path)?);
    Ok(())
}
