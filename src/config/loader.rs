// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::catalog::Target;
use crate::config::model::ConfigFile;

/// Directories searched for `*.toml` config files, in load order:
///
/// 1. `<home>/.config/doo`
/// 2. a `.doo` directory in `cwd` and in every ancestor of `cwd`
///
/// Candidates that do not exist (or are not directories) are skipped.
pub fn config_directories(home: Option<&Path>, cwd: &Path) -> Vec<PathBuf> {
    let mut res = Vec::new();

    let mut add_path = |path: PathBuf| {
        if path.is_dir() {
            res.push(path);
        }
    };

    if let Some(home) = home {
        add_path(home.join(".config").join("doo"));
    }

    let mut dir = cwd;
    loop {
        add_path(dir.join(".doo"));
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    res
}

/// The `*.toml` files of a config directory, sorted by file name so load
/// order (and therefore duplicate-name reporting) is deterministic.
pub fn config_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading config directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load one configuration file and resolve its targets.
///
/// Applies the file's `defaults.cwd`, resolves each target's working
/// directory against the file's own directory, and fills in the default
/// runner. The result is *not* validated; the catalog validator reports all
/// semantic problems in one batch.
pub fn load_config_file(path: &Path, home: Option<&Path>) -> Result<Vec<Target>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {}", path.display()))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {}", path.display()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    // An explicit empty string means the same as an omitted key: fall back
    // to the file's default (or no default at all).
    let default_cwd = match config.defaults.cwd.as_deref() {
        Some(c) if !c.is_empty() => Some(expand_path(c, dir, home)),
        _ => None,
    };

    let mut targets = Vec::with_capacity(config.targets.len());
    for tc in config.targets {
        let cwd = match tc.cwd.as_deref() {
            Some(c) if !c.is_empty() => Some(expand_path(c, dir, home)),
            _ => default_cwd.clone(),
        };

        let runner = match tc.runner {
            Some(r) if !r.is_empty() => r,
            _ => "shell".to_string(),
        };

        targets.push(Target {
            name: tc.name,
            runner,
            command: tc.command,
            cwd,
            dependencies: tc.dependencies,
            invokes: tc.invokes,
            listens: tc.listens,
            dependants: Vec::new(),
            config_path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), targets = targets.len(), "loaded config file");
    Ok(targets)
}

/// Resolve a configured path:
///
/// - `~`-prefixed: the home directory replaces the `~` (plain string
///   splice, so `~/x` becomes `<home>/x`)
/// - absolute: unchanged
/// - otherwise: joined onto `from` (the config file's directory)
pub fn expand_path(path: &str, from: &Path, home: Option<&Path>) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = home {
            let mut s = home.as_os_str().to_os_string();
            s.push(rest);
            return PathBuf::from(s);
        }
    }

    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        from.join(path)
    }
}
