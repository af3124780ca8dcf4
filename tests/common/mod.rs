#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use doo::catalog::{self, Catalog, Target};

/// Builder for `Target` to simplify test setup.
pub struct TargetBuilder {
    target: Target,
}

impl TargetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            target: Target {
                name: name.to_string(),
                runner: "shell".to_string(),
                command: String::new(),
                cwd: None,
                dependencies: vec![],
                invokes: vec![],
                listens: vec![],
                dependants: vec![],
                config_path: PathBuf::from("doo.toml"),
            },
        }
    }

    pub fn runner(mut self, runner: &str) -> Self {
        self.target.runner = runner.to_string();
        self
    }

    pub fn command(mut self, command: &str) -> Self {
        self.target.command = command.to_string();
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.target.cwd = Some(PathBuf::from(cwd));
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.target.dependencies.push(dep.to_string());
        self
    }

    pub fn invokes(mut self, name: &str) -> Self {
        self.target.invokes.push(name.to_string());
        self
    }

    pub fn listens(mut self, addr: &str) -> Self {
        self.target.listens.push(addr.to_string());
        self
    }

    pub fn config_path(mut self, path: &str) -> Self {
        self.target.config_path = PathBuf::from(path);
        self
    }

    pub fn build(self) -> Target {
        self.target
    }
}

pub fn target(name: &str) -> TargetBuilder {
    TargetBuilder::new(name)
}

/// Validate targets that are expected to be well-formed.
pub fn valid_catalog(targets: Vec<Target>) -> Arc<Catalog> {
    Arc::new(catalog::validate(targets).expect("catalog should validate"))
}
