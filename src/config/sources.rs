//! Configuration search path

use std::path::{Path, PathBuf};

/// File names probed in each directory, first match wins.
const FILE_NAMES: &[&str] = &["siterc.toml", "siterc.yaml", "siterc.yml", "siterc.json"];

/// File names probed in the user's home directory.
const HOME_FILE_NAMES: &[&str] = &[".siterc.toml", ".siterc.yaml", ".siterc.yml", ".siterc.json"];

/// Where a configuration source was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Given with `--config`; suppresses every other location.
    Explicit,
    /// Directory of the site being operated on.
    TargetDir,
    /// Installation root of the managed application.
    InstallRoot,
    /// The user's home directory.
    Home,
    /// Directory holding the tool itself.
    ToolDir,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Explicit => "explicit",
            SourceKind::TargetDir => "site",
            SourceKind::InstallRoot => "root",
            SourceKind::Home => "home",
            SourceKind::ToolDir => "tool",
        }
    }
}

/// A configuration file that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: SourceKind,
    pub path: PathBuf,
}

/// The fixed, ordered list of directories searched for configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    target_dir: Option<PathBuf>,
    install_root: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    tool_dir: Option<PathBuf>,
}

impl SearchPath {
    /// Empty search path; nothing is discovered until directories are set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search path for the running process: `$HOME` and the directory of the
    /// current executable. Target dir and install root come from the caller.
    pub fn from_env() -> Self {
        Self {
            target_dir: None,
            install_root: None,
            home_dir: std::env::var_os("HOME").map(PathBuf::from),
            tool_dir: std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
        }
    }

    pub fn target_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.target_dir = dir;
        self
    }

    pub fn install_root(mut self, dir: Option<PathBuf>) -> Self {
        self.install_root = dir;
        self
    }

    pub fn home_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.home_dir = dir;
        self
    }

    pub fn tool_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tool_dir = dir;
        self
    }

    /// Directories in priority order, highest first.
    pub fn locations(&self) -> Vec<(SourceKind, &Path)> {
        [
            (SourceKind::TargetDir, self.target_dir.as_deref()),
            (SourceKind::InstallRoot, self.install_root.as_deref()),
            (SourceKind::Home, self.home_dir.as_deref()),
            (SourceKind::ToolDir, self.tool_dir.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, dir)| dir.map(|d| (kind, d)))
        .collect()
    }

    /// Existing configuration files, highest priority first.
    ///
    /// A directory reached twice (e.g. the site dir is the install root) is
    /// only reported once, at its highest priority.
    pub fn discover(&self) -> Vec<Candidate> {
        let mut found: Vec<Candidate> = Vec::new();
        for (kind, dir) in self.locations() {
            let names = if kind == SourceKind::Home { HOME_FILE_NAMES } else { FILE_NAMES };
            let Some(path) = names.iter().map(|name| dir.join(name)).find(|p| p.is_file()) else {
                tracing::debug!("No config in {} directory {}", kind.label(), dir.display());
                continue;
            };
            if found.iter().any(|c| c.path == path) {
                continue;
            }
            tracing::debug!("Found {} config {}", kind.label(), path.display());
            found.push(Candidate { kind, path });
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discover_returns_existing_files_in_priority_order() {
        let tmp = TempDir::new().expect("tmp");
        let site = tmp.path().join("site");
        let root = tmp.path().join("root");
        let home = tmp.path().join("home");
        for dir in [&site, &root, &home] {
            fs::create_dir_all(dir).expect("mkdir");
        }
        fs::write(home.join(".siterc.yml"), "v: 1\n").expect("write");
        fs::write(site.join("siterc.toml"), "v = 1\n").expect("write");

        let search = SearchPath::new()
            .target_dir(Some(site.clone()))
            .install_root(Some(root))
            .home_dir(Some(home.clone()));
        let found = search.discover();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Candidate { kind: SourceKind::TargetDir, path: site.join("siterc.toml") });
        assert_eq!(found[1], Candidate { kind: SourceKind::Home, path: home.join(".siterc.yml") });
    }

    #[test]
    fn home_directory_requires_dot_prefixed_name() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("siterc.toml"), "v = 1\n").expect("write");

        let search = SearchPath::new().home_dir(Some(tmp.path().to_path_buf()));
        assert!(search.discover().is_empty());
    }

    #[test]
    fn shared_directory_is_reported_once() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("siterc.toml"), "v = 1\n").expect("write");

        let search = SearchPath::new()
            .target_dir(Some(tmp.path().to_path_buf()))
            .install_root(Some(tmp.path().to_path_buf()));
        let found = search.discover();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SourceKind::TargetDir);
    }
}
