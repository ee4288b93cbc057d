//! siterc: configuration discovery and site alias resolution
//!
//! Loads option files from a fixed search path, merges them (tagged tables
//! combine per tag) and turns `site-aliases` entries into connection and path
//! records for sync and database commands.

pub mod alias;
pub mod config;
pub mod error;

pub use alias::{AliasResolver, SiteAlias};
pub use config::{ConfigLoader, Configuration, SearchPath};
pub use error::{Result, SiteError};
