// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from one TOML file.
///
/// ```toml
/// [defaults]
/// cwd = "~/src/myproject"
///
/// [[targets]]
/// name = "db"
/// runner = "tmux"
/// command = "postgres -D data"
/// listens = ["127.0.0.1:5432"]
///
/// [[targets]]
/// name = "migrate"
/// command = "make migrate"
/// dependencies = ["db"]
/// ```
///
/// All sections are optional. Unknown keys are rejected so typos surface as
/// load errors instead of silently dead configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Defaults applied to the targets of this file, from `[defaults]`.
    #[serde(default)]
    pub defaults: DefaultsSection,

    /// All targets from `[[targets]]`.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Working directory for targets of this file that do not set their own.
    #[serde(default)]
    pub cwd: Option<String>,
}

/// One `[[targets]]` record.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Unique target name. Validated later; an absent name is a catalog
    /// error, not a parse error, so a whole file of mistakes reports at once.
    #[serde(default)]
    pub name: String,

    /// Runner kind: `shell` (default), `tmux`, or `launchd`.
    #[serde(default)]
    pub runner: Option<String>,

    /// Shell command line for `shell`/`tmux`; plist path for `launchd`.
    #[serde(default)]
    pub command: String,

    /// Working directory. `~`-prefixed and relative paths are resolved at
    /// load time; when absent, `defaults.cwd` applies.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Targets that must have started before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Targets to additionally start after this one completes.
    #[serde(default)]
    pub invokes: Vec<String>,

    /// Readiness endpoints: absolute socket paths or `host:port` addresses.
    #[serde(default)]
    pub listens: Vec<String>,
}
