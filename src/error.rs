//! Error types for configuration loading and alias resolution

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Failed to parse config {}{}: {message}", path.display(), location(*line, *column))]
    ConfigParse {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("Cannot read config {}: {source}", path.display())]
    ConfigSourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported config extension for file {} (expected .toml, .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Site alias not found: @{name}")]
    AliasNotFound { name: String },

    #[error("Site alias @{alias} has no '{field}' setting")]
    MissingRequiredField { alias: String, field: String },

    #[error("Cannot {operation} on @{alias}: the alias has no remote-host")]
    RemoteOperationOnLocalAlias { alias: String, operation: String },

    #[error("Invalid site alias @{name}: {reason}")]
    InvalidAlias { name: String, reason: String },

    #[error("Invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },
}

impl SiteError {
    pub fn missing_field<A: Into<String>, F: Into<String>>(alias: A, field: F) -> Self {
        Self::MissingRequiredField { alias: alias.into(), field: field.into() }
    }

    pub fn invalid_alias<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidAlias { name: name.into(), reason: reason.into() }
    }

    pub fn invalid_option<K: Into<String>, R: Into<String>>(key: K, reason: R) -> Self {
        Self::InvalidOption { key: key.into(), reason: reason.into() }
    }

    /// Whether a loader running in skip mode may drop the offending source and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConfigParse { .. } | Self::ConfigSourceUnreadable { .. })
    }
}

fn location(line: Option<usize>, column: Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (line {}, column {})", line, column),
        (Some(line), None) => format!(" (line {})", line),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_includes_location() {
        let err = SiteError::ConfigParse {
            path: PathBuf::from("/etc/siterc.toml"),
            line: Some(3),
            column: Some(7),
            message: "expected `=`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/siterc.toml"));
        assert!(msg.contains("line 3, column 7"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn alias_errors_are_not_recoverable() {
        let err = SiteError::AliasNotFound { name: "stage".to_string() };
        assert_eq!(err.to_string(), "Site alias not found: @stage");
        assert!(!err.is_recoverable());
    }
}
