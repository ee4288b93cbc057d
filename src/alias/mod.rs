//! Site aliases: named local or remote site targets

pub mod database;
pub mod record;
pub mod resolver;
pub mod target;

pub use database::DbConnection;
pub use record::SiteAlias;
pub use resolver::{AliasResolver, SITE_ALIASES};
pub use target::{SiteTarget, TargetPath};
