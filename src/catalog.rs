// src/catalog.rs

//! The validated target catalog.
//!
//! Targets come out of the config loader with resolved working directories
//! but otherwise unchecked. [`validate`] indexes them by name, accumulates
//! every problem it finds (never stopping at the first), and wires up the
//! reverse dependency edges used by stop runs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use globset::Glob;

use crate::errors::DooError;
use crate::exec;

/// A named, declaratively configured unit of work. Immutable after
/// validation.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    /// Runner kind string; validated against the backend dispatch table.
    pub runner: String,
    /// Shell command line, or plist path for `launchd`. May be empty for
    /// `shell` targets used only for their working directory.
    pub command: String,
    pub cwd: Option<PathBuf>,
    /// Targets that must have started before this one.
    pub dependencies: Vec<String>,
    /// Targets to enqueue for starting after this one completes.
    pub invokes: Vec<String>,
    /// Readiness endpoints: absolute paths or `host:port` addresses.
    pub listens: Vec<String>,
    /// Reverse dependency edges, populated by the validator.
    pub dependants: Vec<String>,
    /// Config file this target was defined in.
    pub config_path: PathBuf,
}

impl Target {
    /// Exclusive targets monopolize the scheduler while they run. Currently
    /// only `shell`, which inherits the controlling terminal.
    pub fn is_exclusive(&self) -> bool {
        self.runner == "shell"
    }
}

/// Name-indexed catalog of validated targets, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    targets: Vec<Arc<Target>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&Arc<Target>> {
        self.index.get(name).map(|&i| &self.targets[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All targets in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &Arc<Target>> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Expand user queries into target names.
    ///
    /// A query that exactly names a target matches just that target; any
    /// other query is compiled as a glob over all target names. A query that
    /// matches nothing is an error.
    pub fn expand_queries(&self, queries: &[String]) -> Result<Vec<String>, DooError> {
        let mut res = Vec::new();

        for q in queries {
            if self.contains(q) {
                res.push(q.clone());
                continue;
            }

            let glob = Glob::new(q)
                .map_err(|source| DooError::BadPattern {
                    pattern: q.clone(),
                    source,
                })?
                .compile_matcher();

            let mut matched_anything = false;
            for target in &self.targets {
                if glob.is_match(&target.name) {
                    matched_anything = true;
                    res.push(target.name.clone());
                }
            }
            if !matched_anything {
                return Err(DooError::NoMatch(q.clone()));
            }
        }

        Ok(res)
    }
}

/// Validate loaded targets into a catalog, accumulating every error.
///
/// Errors reported:
/// - target without a name
/// - duplicate names (same config file vs. across files)
/// - unrecognized runner, or a runner unavailable on this platform
/// - non-`shell` target without a command
/// - dependency or invokes reference to an unknown target
///
/// On success the catalog's `dependants` edges are populated from the
/// successfully resolved dependency references.
pub fn validate(mut targets: Vec<Target>) -> Result<Catalog, Vec<String>> {
    let mut errs: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    // First pass: build the name index.
    for (i, target) in targets.iter().enumerate() {
        let path = target.config_path.display();
        let name = &target.name;

        if name.is_empty() {
            errs.push(format!("Target without name in {path}"));
            continue;
        }

        if let Some(&other) = index.get(name) {
            let other_path = &targets[other].config_path;
            if other_path == &target.config_path {
                errs.push(format!("Duplicate definition for {name} in {path}"));
            } else {
                errs.push(format!(
                    "Duplicate definition for {name} in {path} and {}",
                    other_path.display()
                ));
            }
        }

        if !exec::is_valid_runner(&target.runner) {
            errs.push(format!(
                "Target {name} in {path} has invalid runner: {}",
                target.runner
            ));
        } else if !exec::runner_available(&target.runner) {
            errs.push(format!(
                "Target {name} in {path} has runner {} which is not available on this platform",
                target.runner
            ));
        } else if target.runner != "shell" && target.command.is_empty() {
            errs.push(format!("Target {name} in {path} is missing command"));
        }

        index.insert(name.clone(), i);
    }

    // Second pass: resolve dependency and invokes references, and collect the
    // reverse edges.
    let mut reverse: Vec<(usize, String)> = Vec::new();
    for target in &targets {
        for dep in &target.dependencies {
            match index.get(dep) {
                Some(&other) => reverse.push((other, target.name.clone())),
                None => errs.push(format!(
                    "{} depends on unknown target {dep}",
                    target.name
                )),
            }
        }
        for inv in &target.invokes {
            if !index.contains_key(inv) {
                errs.push(format!("{} invokes unknown target {inv}", target.name));
            }
        }
    }

    if !errs.is_empty() {
        return Err(errs);
    }

    for (i, dependant) in reverse {
        targets[i].dependants.push(dependant);
    }

    let targets: Vec<Arc<Target>> = targets.into_iter().map(Arc::new).collect();
    Ok(Catalog { targets, index })
}
