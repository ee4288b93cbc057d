//! Skip / structure table lists

use std::collections::{BTreeMap, BTreeSet};

use super::value::{Configuration, Value};
use crate::error::{Result, SiteError};

pub const SKIP_TABLES: &str = "skip-tables";
pub const STRUCTURE_TABLES: &str = "structure-tables";

/// Tag → table names, as read from `skip-tables` or `structure-tables`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipTableSet {
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl SkipTableSet {
    /// Read the tagged table list stored under `key`. A missing option yields
    /// an empty set.
    pub fn from_config(config: &Configuration, key: &str) -> Result<Self> {
        let Some(value) = config.get(key) else {
            return Ok(Self::default());
        };
        let Value::Table(entries) = value else {
            return Err(SiteError::invalid_option(key, "expected a table of tag = [tables]"));
        };

        let mut tags = BTreeMap::new();
        for (tag, tables) in entries {
            let set = match tables {
                Value::List(items) => items.iter().cloned().collect(),
                Value::String(s) => s
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| t.to_string())
                    .collect(),
                _ => {
                    return Err(SiteError::invalid_option(
                        format!("{}.{}", key, tag),
                        "expected a list of table names",
                    ))
                }
            };
            tags.insert(tag.clone(), set);
        }
        Ok(Self { tags })
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn tables(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tags.get(tag)
    }

    /// Union of the tables named by a comma-separated list of tags.
    pub fn select(&self, keys: &str) -> BTreeSet<String> {
        let mut selected = BTreeSet::new();
        for tag in keys.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match self.tags.get(tag) {
                Some(tables) => selected.extend(tables.iter().cloned()),
                None => tracing::warn!("No table list tagged '{}'", tag),
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::Map;

    fn config_with(key: &str, value: Value) -> Configuration {
        let mut options = Map::new();
        options.insert(key.to_string(), value);
        Configuration::from_source(options).expect("config")
    }

    fn tags(entries: &[(&str, &[&str])]) -> Value {
        Value::Table(
            entries
                .iter()
                .map(|(tag, tables)| {
                    (tag.to_string(), Value::List(tables.iter().map(|t| t.to_string()).collect()))
                })
                .collect(),
        )
    }

    #[test]
    fn select_unions_tags_and_ignores_unknown() {
        let config = config_with(
            SKIP_TABLES,
            tags(&[("common", &["cache", "sessions"]), ("logs", &["watchdog", "cache"])]),
        );
        let set = SkipTableSet::from_config(&config, SKIP_TABLES).expect("set");

        let selected: Vec<String> = set.select("common, logs,missing").into_iter().collect();
        assert_eq!(selected, vec!["cache", "sessions", "watchdog"]);
        assert_eq!(set.tags().collect::<Vec<_>>(), vec!["common", "logs"]);
    }

    #[test]
    fn missing_option_is_empty() {
        let set = SkipTableSet::from_config(&Configuration::new(), STRUCTURE_TABLES).expect("set");
        assert!(set.tables("common").is_none());
        assert!(set.select("common").is_empty());
    }

    #[test]
    fn non_table_option_is_rejected() {
        let config = config_with(SKIP_TABLES, Value::List(vec!["cache".into()]));
        assert!(matches!(
            SkipTableSet::from_config(&config, SKIP_TABLES),
            Err(SiteError::InvalidOption { .. })
        ));
    }
}
