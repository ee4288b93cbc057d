//! Config file loading

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::env::load_environment;
use super::sources::{Candidate, SearchPath, SourceKind};
use super::value::{options_from_raw, Configuration, MergeStage, RawValue};
use crate::error::{Result, SiteError};

/// What to do with a discovered source that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Warn and continue without the source.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

/// Result of a load: the merged configuration and where it came from.
#[derive(Debug)]
pub struct Loaded {
    pub config: Configuration,
    /// Sources that contributed, highest priority first.
    pub sources: Vec<Candidate>,
    /// Discovered sources that were dropped, with the reason.
    pub skipped: Vec<(Candidate, SiteError)>,
}

/// Discovers configuration sources and merges them into one [`Configuration`].
pub struct ConfigLoader {
    search_path: SearchPath,
    explicit: Option<PathBuf>,
    policy: ParsePolicy,
    environment: bool,
}

impl ConfigLoader {
    pub fn new(search_path: SearchPath) -> Self {
        Self { search_path, explicit: None, policy: ParsePolicy::Skip, environment: true }
    }

    /// Load only this file; every search path location is ignored.
    pub fn explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the `SITERC_*` environment stage.
    pub fn environment(mut self, enabled: bool) -> Self {
        self.environment = enabled;
        self
    }

    pub fn load(&self) -> Result<Loaded> {
        let (mut config, sources, skipped) = match &self.explicit {
            Some(path) => {
                let candidate = Candidate { kind: SourceKind::Explicit, path: path.clone() };
                let config = load_source(path)?;
                (config, vec![candidate], Vec::new())
            }
            None => self.load_discovered()?,
        };

        if self.environment {
            tracing::debug!("Merge stage {:?}", MergeStage::Environment);
            config = config.merge_environment(load_environment());
        }

        // Overrides are kept apart from options and only folded in by
        // `Configuration::variables`, so this stage is the last writer.
        tracing::debug!("Merge stage {:?}: {} override(s)", MergeStage::Overrides, config.overrides().len());

        Ok(Loaded { config, sources, skipped })
    }

    fn load_discovered(&self) -> Result<(Configuration, Vec<Candidate>, Vec<(Candidate, SiteError)>)> {
        tracing::debug!("Merge stage {:?}", MergeStage::Sources);
        let mut parsed = Vec::new();
        let mut skipped = Vec::new();

        for candidate in self.search_path.discover() {
            match load_source(&candidate.path) {
                Ok(config) => parsed.push((candidate, config)),
                Err(e @ SiteError::ConfigSourceUnreadable { .. }) => {
                    tracing::warn!("Skipping unreadable {} config: {}", candidate.kind.label(), e);
                    skipped.push((candidate, e));
                }
                Err(e) if self.policy == ParsePolicy::Skip && e.is_recoverable() => {
                    tracing::warn!("Skipping malformed {} config: {}", candidate.kind.label(), e);
                    skipped.push((candidate, e));
                }
                Err(e) => return Err(e),
            }
        }

        // Discovery order is highest priority first; merge from the bottom up.
        let config = parsed
            .iter()
            .rev()
            .fold(Configuration::new(), |acc, (_, config)| acc.merge(config.clone()));
        let sources = parsed.into_iter().map(|(candidate, _)| candidate).collect();
        Ok((config, sources, skipped))
    }
}

/// Read and parse a single configuration file, choosing the format by extension.
pub fn load_source(path: &Path) -> Result<Configuration> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let parse: fn(&str, &Path) -> Result<RawSource> = match ext.as_str() {
        "toml" => parse_toml,
        "yaml" | "yml" => parse_yaml,
        "json" => parse_json,
        _ => return Err(SiteError::UnsupportedFormat { path: path.to_path_buf() }),
    };

    let content = fs::read_to_string(path)
        .map_err(|source| SiteError::ConfigSourceUnreadable { path: path.to_path_buf(), source })?;

    // Shape errors found after parsing still belong to this one source, so they
    // are reported as parse errors and stay skippable.
    let shape_error = |e: SiteError| SiteError::ConfigParse {
        path: path.to_path_buf(),
        line: None,
        column: None,
        message: e.to_string(),
    };
    let options = options_from_raw(parse(&content, path)?).map_err(shape_error)?;
    tracing::debug!("Parsed {} option(s) from {}", options.len(), path.display());
    Configuration::from_source(options).map_err(shape_error)
}

type RawSource = BTreeMap<String, RawValue>;

fn parse_toml(content: &str, path: &Path) -> Result<RawSource> {
    toml::from_str(content).map_err(|e| {
        let (line, column) = match e.span() {
            Some(span) => {
                let (line, column) = line_column(content, span.start);
                (Some(line), Some(column))
            }
            None => (None, None),
        };
        SiteError::ConfigParse {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message().to_string(),
        }
    })
}

fn parse_yaml(content: &str, path: &Path) -> Result<RawSource> {
    // An empty YAML document is a null; treat it as an empty source.
    if content.trim().is_empty() {
        return Ok(RawSource::new());
    }
    serde_yaml::from_str(content).map_err(|e| {
        let location = e.location();
        SiteError::ConfigParse {
            path: path.to_path_buf(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: e.to_string(),
        }
    })
}

fn parse_json(content: &str, path: &Path) -> Result<RawSource> {
    serde_json::from_str(content).map_err(|e| SiteError::ConfigParse {
        path: path.to_path_buf(),
        line: Some(e.line()),
        column: Some(e.column()),
        message: e.to_string(),
    })
}

/// 1-based line and column of a byte offset.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
    (line, column)
}
