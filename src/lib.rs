// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::catalog::Target;
use crate::cli::CliArgs;
use crate::config::loader::{config_directories, config_files_in, load_config_file};
use crate::dag::JobSet;
use crate::engine::Runtime;
use crate::errors::DooError;
use crate::report::Reporter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config discovery and loading
/// - catalog validation
/// - query expansion (and the `--list` / `--pwd` short-circuits)
/// - job graph construction
/// - the scheduler run and its exit contract
pub async fn run(args: CliArgs) -> Result<()> {
    let home = dirs::home_dir();
    let cwd = std::env::current_dir().context("resolving current directory")?;

    let mut targets: Vec<Target> = Vec::new();
    for dir in config_directories(home.as_deref(), &cwd) {
        debug!(dir = %dir.display(), "searching config directory");
        for file in config_files_in(&dir)? {
            targets.extend(load_config_file(&file, home.as_deref())?);
        }
    }
    for file in &args.load {
        targets.extend(load_config_file(file, home.as_deref())?);
    }

    let catalog = match catalog::validate(targets) {
        Ok(catalog) => Arc::new(catalog),
        Err(errs) => return Err(validation_failure(errs).into()),
    };

    let matched = catalog.expand_queries(&args.targets)?;

    if args.pwd {
        for name in &matched {
            if let Some(target) = catalog.get(name) {
                match &target.cwd {
                    Some(cwd) => println!("{}", cwd.display()),
                    None => println!(),
                }
            }
        }
        return Ok(());
    }

    if args.list {
        if args.targets.is_empty() {
            for target in catalog.targets() {
                println!("{}", target.name);
            }
        } else {
            for name in &matched {
                println!("{name}");
            }
        }
        return Ok(());
    }

    if matched.is_empty() {
        return Err(DooError::NothingToDo.into());
    }

    let mut jobs = JobSet::new(catalog.clone(), args.only);
    for name in &matched {
        if args.stop {
            jobs.create_stop_job(name);
        } else {
            jobs.create_start_job(name);
        }
    }

    info!(jobs = jobs.len(), stop = args.stop, "running job graph");
    let summary = Runtime::new(jobs, Reporter::new()).run().await;

    if summary.did_error {
        // Failures were already reported per job with `!!` lines.
        std::process::exit(1);
    }
    if !summary.completed {
        return Err(DooError::Deadlocked.into());
    }
    Ok(())
}

fn validation_failure(errs: Vec<String>) -> DooError {
    let mut msg = format!("found {} error(s):", errs.len());
    for err in &errs {
        msg.push_str("\n- ");
        msg.push_str(err);
    }
    DooError::Validation(msg)
}
