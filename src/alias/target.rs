//! `@alias:%path` target specifications

/// Which path inside an alias a target refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPath {
    /// The site root.
    Root,
    /// A named path alias, optionally followed by a sub-path.
    Alias { name: String, rest: Option<String> },
    /// A literal path, relative to root unless absolute.
    Path(String),
}

/// A parsed target such as `@stage:%files/images` or a bare `dev`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTarget {
    pub alias: String,
    pub path: TargetPath,
}

impl SiteTarget {
    /// Parse `[@]alias[:%path-alias[/rest] | :path]`. Returns `None` for an
    /// empty alias name.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (alias, path) = match spec.split_once(':') {
            Some((alias, path)) => (alias, Some(path)),
            None => (spec, None),
        };
        let alias = alias.strip_prefix('@').unwrap_or(alias);
        if alias.is_empty() {
            return None;
        }

        let path = match path.map(str::trim) {
            None | Some("") => TargetPath::Root,
            Some(p) => match p.strip_prefix('%') {
                Some(named) => {
                    let (name, rest) = match named.split_once('/') {
                        Some((name, rest)) if !rest.is_empty() => (name, Some(rest.to_string())),
                        Some((name, _)) => (name, None),
                        None => (named, None),
                    };
                    TargetPath::Alias { name: name.to_string(), rest }
                }
                None => TargetPath::Path(p.to_string()),
            },
        };

        Some(Self { alias: alias.to_string(), path })
    }
}
