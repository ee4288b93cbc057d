//! Configuration discovery and merging
//!
//! Sources are searched in a fixed order (site dir > install root > home >
//! tool dir) unless an explicit file is given, then merged with tagged tables
//! (`skip-tables`, `structure-tables`, `site-aliases`) combined per tag.

pub mod env;
pub mod loader;
pub mod sources;
pub mod tables;
pub mod value;

pub use loader::{load_source, ConfigLoader, Loaded, ParsePolicy};
pub use sources::{Candidate, SearchPath, SourceKind};
pub use tables::{SkipTableSet, SKIP_TABLES, STRUCTURE_TABLES};
pub use value::{Configuration, Map, MergeStage, Value};
