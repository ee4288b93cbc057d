//! Option values and the merged configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SiteError};

pub type Map = BTreeMap<String, Value>;

/// Option keys whose mapping values are merged entry-by-entry instead of replaced.
pub const TAGGED_KEYS: &[&str] = &["skip-tables", "structure-tables", "site-aliases"];

/// Per-source table of variable overrides, applied after every other stage.
pub const OVERRIDE_KEY: &str = "override";

/// Option that variable overrides are applied onto.
pub const VARIABLES_KEY: &str = "variables";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
    Table(Map),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Map> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Loose boolean reading: `1`, `"true"`, `"yes"` and `"on"` count as true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Render scalars as plain strings.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::List(_) | Value::Table(_) => None,
        }
    }
}

/// Value as written in a source file, before nulls are dropped and list
/// items are flattened to strings.
///
/// Variant order matters for untagged deserialization: integers must be tried
/// before floats.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<RawValue>),
    Table(BTreeMap<String, RawValue>),
}

/// Convert a parsed source into options. Null values count as absent keys;
/// list items must be scalars and are kept as strings.
pub fn options_from_raw(raw: BTreeMap<String, RawValue>) -> Result<Map> {
    convert_table("", raw)
}

fn convert_table(prefix: &str, raw: BTreeMap<String, RawValue>) -> Result<Map> {
    let mut table = Map::new();
    for (key, value) in raw {
        let path = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };
        if let Some(value) = convert_value(&path, value)? {
            table.insert(key, value);
        }
    }
    Ok(table)
}

fn convert_value(path: &str, raw: RawValue) -> Result<Option<Value>> {
    let value = match raw {
        RawValue::Null => return Ok(None),
        RawValue::Bool(b) => Value::Bool(b),
        RawValue::Integer(i) => Value::Integer(i),
        RawValue::Float(f) => Value::Float(f),
        RawValue::String(s) => Value::String(s),
        RawValue::List(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match convert_value(path, item)? {
                    None => {}
                    Some(Value::List(_)) | Some(Value::Table(_)) => {
                        return Err(SiteError::invalid_option(path, "list items must be scalar values"))
                    }
                    Some(scalar) => list.extend(scalar.to_scalar_string()),
                }
            }
            Value::List(list)
        }
        RawValue::Table(t) => Value::Table(convert_table(path, t)?),
    };
    Ok(Some(value))
}

/// Stages of building the effective configuration, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    /// Configuration files, lowest priority first.
    Sources,
    /// `SITERC_*` environment variables.
    Environment,
    /// Variable overrides collected from every source.
    Overrides,
}

/// The effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    #[serde(flatten)]
    options: Map,
    #[serde(rename = "override", skip_serializing_if = "Map::is_empty")]
    overrides: Map,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from one parsed source, splitting off its
    /// `override` table into the override stage.
    pub fn from_source(mut options: Map) -> Result<Self> {
        let overrides = match options.remove(OVERRIDE_KEY) {
            None => Map::new(),
            Some(Value::Table(t)) => t,
            Some(_) => {
                return Err(SiteError::invalid_option(OVERRIDE_KEY, "expected a table of variables"))
            }
        };
        Ok(Self { options, overrides })
    }

    pub fn options(&self) -> &Map {
        &self.options
    }

    pub fn overrides(&self) -> &Map {
        &self.overrides
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_table(&self, key: &str) -> Option<&Map> {
        self.get(key).and_then(Value::as_table)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.options.insert(key.into(), value);
    }

    /// Read a POSIX `:`-separated path option (`include`, `script-path`).
    /// Lists are accepted as-is.
    pub fn path_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s
                .split(':')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect()),
            Some(Value::List(items)) => Ok(items.clone()),
            Some(_) => Err(SiteError::invalid_option(key, "expected a ':'-separated string or list")),
        }
    }

    /// Merge `other` on top of `self`; `other` wins on conflicts.
    ///
    /// Tagged keys merge their entries by tag; within one tag the later entry
    /// replaces the earlier one wholesale.
    pub fn merge(mut self, other: Configuration) -> Configuration {
        for (key, value) in other.options {
            merge_option(&mut self.options, key, value);
        }
        self.overrides.extend(other.overrides);
        self
    }

    /// Merge scalar environment options on top of the file sources.
    pub fn merge_environment(mut self, env: Map) -> Configuration {
        for (key, value) in env {
            merge_option(&mut self.options, key, value);
        }
        self
    }

    /// Effective `variables` table: the merged option with every variable
    /// override applied on top.
    pub fn variables(&self) -> Map {
        let mut vars = self.get_table(VARIABLES_KEY).cloned().unwrap_or_default();
        vars.extend(self.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }
}

fn merge_option(options: &mut Map, key: String, value: Value) {
    if TAGGED_KEYS.contains(&key.as_str()) {
        if let (Some(Value::Table(existing)), Value::Table(incoming)) = (options.get_mut(&key), &value)
        {
            for (tag, entry) in incoming {
                existing.insert(tag.clone(), entry.clone());
            }
            return;
        }
    }
    options.insert(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }

    fn table(entries: Vec<(&str, Value)>) -> Value {
        Value::Table(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn config(entries: Vec<(&str, Value)>) -> Configuration {
        Configuration::from_source(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
            .expect("config")
    }

    #[test]
    fn higher_priority_tag_replaces_lower_and_new_tags_are_added() {
        let low = config(vec![("skip-tables", table(vec![("common", list(&["cache", "sessions"]))]))]);
        let high = config(vec![(
            "skip-tables",
            table(vec![("common", list(&["watchdog"])), ("extra", list(&["foo"]))]),
        )]);

        let merged = low.merge(high);
        let skip = merged.get_table("skip-tables").expect("skip-tables");
        assert_eq!(skip.get("common"), Some(&list(&["watchdog"])));
        assert_eq!(skip.get("extra"), Some(&list(&["foo"])));
        assert_eq!(skip.len(), 2);
    }

    #[test]
    fn distinct_tags_from_both_sources_survive() {
        let a = config(vec![("structure-tables", table(vec![("common", list(&["cache"]))]))]);
        let b = config(vec![("structure-tables", table(vec![("search", list(&["search_index"]))]))]);

        let merged = a.merge(b);
        let tags: Vec<&String> = merged.get_table("structure-tables").expect("tables").keys().collect();
        assert_eq!(tags, vec!["common", "search"]);
    }

    #[test]
    fn untagged_tables_are_replaced_wholesale() {
        let a = config(vec![("variables", table(vec![("site_name", Value::String("A".into()))]))]);
        let b = config(vec![("variables", table(vec![("theme_default", Value::String("b".into()))]))]);

        let merged = a.merge(b);
        let vars = merged.get_table("variables").expect("variables");
        assert!(vars.get("site_name").is_none());
        assert!(vars.contains_key("theme_default"));
    }

    #[test]
    fn key_only_in_lowest_priority_source_is_kept() {
        let low = config(vec![("package-handler", Value::String("cvs".into()))]);
        let high = config(vec![("v", Value::Integer(1))]);

        let merged = low.merge(high);
        assert_eq!(merged.get_str("package-handler"), Some("cvs"));
        assert_eq!(merged.get_bool("v"), Some(true));
    }

    #[test]
    fn merging_with_itself_is_idempotent() {
        let c = config(vec![
            ("r", Value::String("/var/www".into())),
            ("skip-tables", table(vec![("common", list(&["cache"]))])),
            ("override", table(vec![("site_name", Value::String("Mine".into()))])),
        ]);
        assert_eq!(c.clone().merge(c.clone()), c);
    }

    #[test]
    fn overrides_win_over_later_variables() {
        let a = config(vec![("override", table(vec![("site_name", Value::String("Pinned".into()))]))]);
        let b = config(vec![("variables", table(vec![("site_name", Value::String("Loose".into()))]))]);

        let merged = a.merge(b);
        assert_eq!(merged.variables().get("site_name"), Some(&Value::String("Pinned".into())));
        assert!(merged.get("override").is_none());
    }

    #[test]
    fn path_list_splits_on_colons() {
        let c = config(vec![("script-path", Value::String("sites/all/scripts: profiles/x/scripts".into()))]);
        assert_eq!(c.path_list("script-path").expect("paths"), vec!["sites/all/scripts", "profiles/x/scripts"]);
        assert!(c.path_list("i").expect("empty").is_empty());
    }

    fn raw(json: &str) -> Result<Map> {
        options_from_raw(serde_json::from_str(json).expect("json"))
    }

    #[test]
    fn null_values_are_dropped() {
        let options = raw(r#"{"l": null, "uri": "x", "site-aliases": {"dev": {"remote-user": null}}}"#)
            .expect("options");
        assert!(!options.contains_key("l"));
        assert_eq!(options.get("uri"), Some(&Value::String("x".into())));
        let dev = options["site-aliases"].as_table().and_then(|t| t.get("dev")).expect("dev");
        assert_eq!(dev, &Value::Table(Map::new()));
    }

    #[test]
    fn scalar_list_items_become_strings() {
        let options = raw(r#"{"ports": [80, 443, true]}"#).expect("options");
        assert_eq!(options.get("ports"), Some(&list(&["80", "443", "true"])));
    }

    #[test]
    fn nested_list_items_are_rejected_by_key() {
        let err = raw(r#"{"skip-tables": {"common": [["cache"]]}}"#).expect_err("nested list");
        match err {
            SiteError::InvalidOption { key, .. } => assert_eq!(key, "skip-tables.common"),
            other => panic!("expected invalid option, got {:?}", other),
        }
    }

    #[test]
    fn non_table_override_is_rejected() {
        let result = Configuration::from_source(
            [("override".to_string(), Value::String("x".into()))].into_iter().collect(),
        );
        assert!(matches!(result, Err(SiteError::InvalidOption { .. })));
    }
}
