//! Resolved site alias records

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::database::DbConnection;
use super::target::TargetPath;
use crate::config::{Map, Value};
use crate::error::{Result, SiteError};

pub const ROOT: &str = "root";
pub const DRUSH: &str = "drush";
pub const DRUSH_SCRIPT: &str = "drush-script";
pub const DUMP: &str = "dump";
pub const FILES: &str = "files";

/// Script name assumed on remote machines when `drush-script` is not set.
const REMOTE_SCRIPT: &str = "drush";

/// Connection and path information for one named site.
///
/// Built from a `site-aliases` entry and never modified afterwards. Fields
/// are validated lazily: a missing `root` only fails the operation that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAlias {
    name: String,
    db_url: Option<String>,
    databases: Option<Map>,
    remote_port: Option<u16>,
    uri: Option<String>,
    remote_host: Option<String>,
    remote_user: Option<String>,
    path_aliases: BTreeMap<String, String>,
    extra: Map,
}

impl SiteAlias {
    /// Build a record from its `site-aliases` table entry.
    pub fn from_record(name: &str, record: &Value) -> Result<Self> {
        let Value::Table(fields) = record else {
            return Err(SiteError::invalid_alias(name, "alias record must be a table"));
        };

        let mut alias = SiteAlias {
            name: name.to_string(),
            db_url: None,
            databases: None,
            remote_port: None,
            uri: None,
            remote_host: None,
            remote_user: None,
            path_aliases: BTreeMap::new(),
            extra: Map::new(),
        };

        for (key, value) in fields {
            match key.as_str() {
                "db-url" => alias.db_url = Some(string_field(name, key, value)?),
                "databases" => match value {
                    Value::Table(t) => alias.databases = Some(t.clone()),
                    _ => return Err(SiteError::invalid_alias(name, "'databases' must be a table")),
                },
                "remote-port" => alias.remote_port = Some(port_field(name, key, value)?),
                "uri" => alias.uri = Some(string_field(name, key, value)?),
                "remote-host" => alias.remote_host = Some(string_field(name, key, value)?),
                "remote-user" => alias.remote_user = Some(string_field(name, key, value)?),
                "path-aliases" => alias.path_aliases = path_aliases(name, value)?,
                _ => {
                    alias.extra.insert(key.clone(), value.clone());
                }
            }
        }

        if alias.remote_host.is_none() && alias.remote_user.is_some() {
            tracing::debug!("Alias @{} sets remote-user without remote-host; ignoring it", name);
        }
        Ok(alias)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn db_url(&self) -> Option<&str> {
        self.db_url.as_deref()
    }

    pub fn remote_host(&self) -> Option<&str> {
        self.remote_host.as_deref()
    }

    /// Login user; meaningless for local aliases, so `None` there.
    pub fn remote_user(&self) -> Option<&str> {
        self.remote_host.as_ref().and(self.remote_user.as_deref())
    }

    /// Actual database port on the remote machine; `None` for local aliases.
    pub fn remote_port(&self) -> Option<u16> {
        self.remote_host.as_ref().and(self.remote_port)
    }

    /// User-defined fields that are not part of the alias record schema.
    pub fn extra(&self) -> &Map {
        &self.extra
    }

    pub fn is_remote(&self) -> bool {
        self.remote_host.is_some()
    }

    /// Fail unless this alias points at a remote host; returns the host.
    pub fn require_remote(&self, operation: &str) -> Result<&str> {
        self.remote_host.as_deref().ok_or_else(|| SiteError::RemoteOperationOnLocalAlias {
            alias: self.name.clone(),
            operation: operation.to_string(),
        })
    }

    /// `user@host` (or just `host`) for ssh and rsync.
    pub fn ssh_destination(&self) -> Result<String> {
        let host = self.require_remote("connect over ssh")?;
        Ok(match self.remote_user() {
            Some(user) => format!("{}@{}", user, host),
            None => host.to_string(),
        })
    }

    /// Path alias exactly as written in the record, without defaults.
    pub fn path_alias(&self, name: &str) -> Option<&str> {
        self.path_aliases.get(normalize_path_alias(name)).map(String::as_str)
    }

    pub fn path_alias_names(&self) -> impl Iterator<Item = &str> {
        self.path_aliases.keys().map(String::as_str)
    }

    /// The site root, which must be an absolute path.
    pub fn root(&self) -> Result<PathBuf> {
        let root = self
            .path_aliases
            .get(ROOT)
            .ok_or_else(|| SiteError::missing_field(&self.name, ROOT))?;
        let root = PathBuf::from(root);
        if !root.is_absolute() {
            return Err(SiteError::invalid_alias(
                &self.name,
                format!("root must be an absolute path, got '{}'", root.display()),
            ));
        }
        Ok(root)
    }

    /// Resolve a path alias to a concrete path, applying defaults for
    /// `drush` / `drush-script` and resolving relative paths against root.
    pub fn resolve_path(&self, name: &str) -> Result<PathBuf> {
        let name = normalize_path_alias(name);
        if name == ROOT {
            return self.root();
        }

        let raw = match self.path_aliases.get(name) {
            Some(path) => PathBuf::from(path),
            None => return self.default_path(name),
        };
        if raw.is_absolute() {
            Ok(raw)
        } else {
            Ok(self.root()?.join(raw))
        }
    }

    fn default_path(&self, name: &str) -> Result<PathBuf> {
        let missing = || SiteError::missing_field(&self.name, name);
        match name {
            DRUSH => current_exe().and_then(|exe| exe.parent().map(Path::to_path_buf)).ok_or_else(missing),
            DRUSH_SCRIPT if self.is_remote() => Ok(PathBuf::from(REMOTE_SCRIPT)),
            DRUSH_SCRIPT => current_exe().ok_or_else(missing),
            _ => Err(missing()),
        }
    }

    /// Render an rsync source/destination for this alias.
    pub fn rsync_target(&self, target: &TargetPath) -> Result<String> {
        let path = match target {
            TargetPath::Root => self.root()?,
            TargetPath::Alias { name, rest } => {
                let base = self.resolve_path(name)?;
                match rest {
                    Some(rest) => base.join(rest),
                    None => base,
                }
            }
            TargetPath::Path(p) => {
                let p = PathBuf::from(p);
                if p.is_absolute() {
                    p
                } else {
                    self.root()?.join(p)
                }
            }
        };

        if self.is_remote() {
            Ok(format!("{}:{}", self.ssh_destination()?, path.display()))
        } else {
            Ok(path.display().to_string())
        }
    }

    /// Database connection from `db-url`, or from `databases.default.default`.
    pub fn database(&self) -> Result<DbConnection> {
        let mut conn = if let Some(url) = &self.db_url {
            DbConnection::from_url(&self.name, url)?
        } else if let Some(databases) = &self.databases {
            DbConnection::from_databases(&self.name, databases)?
        } else {
            return Err(SiteError::missing_field(&self.name, "db-url"));
        };
        if self.is_remote() {
            conn.remote_port = self.remote_port().or(conn.port);
        }
        Ok(conn)
    }

    /// Complete record with defaults filled in, as the `--full` listing shows it.
    pub fn full_record(&self) -> Map {
        let mut record = self.extra.clone();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                record.insert(key.to_string(), Value::String(v));
            }
        };
        put("db-url", self.db_url.clone());
        put("uri", self.uri.clone());
        put("remote-host", self.remote_host.clone());
        put("remote-user", self.remote_user().map(str::to_string));
        if let Some(port) = self.remote_port() {
            record.insert("remote-port".to_string(), Value::Integer(i64::from(port)));
        }
        if let Some(databases) = &self.databases {
            record.insert("databases".to_string(), Value::Table(databases.clone()));
        }

        let mut paths = Map::new();
        let mut names: Vec<&str> = self.path_aliases.keys().map(String::as_str).collect();
        for reserved in [DRUSH, DRUSH_SCRIPT] {
            if !names.contains(&reserved) {
                names.push(reserved);
            }
        }
        for name in names {
            if let Ok(path) = self.resolve_path(name) {
                paths.insert(name.to_string(), Value::String(path.display().to_string()));
            }
        }
        if !paths.is_empty() {
            record.insert("path-aliases".to_string(), Value::Table(paths));
        }
        record
    }
}

/// `!root` and `root` name the same path alias.
fn normalize_path_alias(name: &str) -> &str {
    name.strip_prefix('!').unwrap_or(name)
}

fn current_exe() -> Option<PathBuf> {
    std::env::current_exe().ok()
}

fn string_field(alias: &str, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(SiteError::invalid_alias(alias, format!("'{}' must be a string", key))),
    }
}

fn port_field(alias: &str, key: &str, value: &Value) -> Result<u16> {
    let port = match value {
        Value::Integer(i) => u16::try_from(*i).ok(),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    port.ok_or_else(|| SiteError::invalid_alias(alias, format!("'{}' must be a port number", key)))
}

fn path_aliases(alias: &str, value: &Value) -> Result<BTreeMap<String, String>> {
    let Value::Table(entries) = value else {
        return Err(SiteError::invalid_alias(alias, "'path-aliases' must be a table"));
    };
    entries
        .iter()
        .map(|(key, path)| match path {
            Value::String(p) => Ok((normalize_path_alias(key).to_string(), p.clone())),
            _ => Err(SiteError::invalid_alias(alias, format!("path alias '{}' must be a string", key))),
        })
        .collect()
}
