// src/exec/mod.rs

//! Runner backends.
//!
//! Each target names a runner kind; the kinds form a closed set dispatched
//! through [`runner_for`]:
//!
//! - [`shell`]: foreground `bash -c`, exclusive while it runs.
//! - [`tmux`]: detached terminal-multiplexer session.
//! - [`launchd`]: host service-manager bootstrap/bootout (macOS only).
//!
//! [`run_job`] routes one job to its backend and, for start jobs, follows up
//! with the readiness [`probe`] over the target's `listens` addresses.

pub mod launchd;
pub mod probe;
pub mod shell;
pub mod tmux;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::catalog::Target;
use crate::dag::JobMode;

use launchd::LaunchdRunner;
use shell::ShellRunner;
use tmux::TmuxRunner;

/// A runner backend knows how to start and stop one kind of target.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn start(&self, target: &Target) -> Result<()>;
    async fn stop(&self, target: &Target) -> Result<()>;
}

/// Dispatch table from runner-kind strings to backend instances.
pub fn runner_for(kind: &str) -> Option<&'static dyn Runner> {
    match kind {
        "shell" => Some(&ShellRunner),
        "tmux" => Some(&TmuxRunner),
        "launchd" => Some(&LaunchdRunner),
        _ => None,
    }
}

/// Whether `kind` names a known backend (on any platform).
pub fn is_valid_runner(kind: &str) -> bool {
    runner_for(kind).is_some()
}

/// Whether `kind`'s backend can actually run on this host. The service
/// manager backend only exists on macOS.
pub fn runner_available(kind: &str) -> bool {
    match kind {
        "launchd" => cfg!(target_os = "macos"),
        _ => true,
    }
}

/// Execute one job against its backend.
///
/// A target with no command is a no-op in either mode. After a successful
/// start, each `listens` address must come up before the job counts as done.
pub async fn run_job(target: &Target, mode: JobMode) -> Result<()> {
    if target.command.is_empty() {
        return Ok(());
    }

    let runner = runner_for(&target.runner)
        .ok_or_else(|| anyhow!("no runner backend for kind '{}'", target.runner))?;

    match mode {
        JobMode::Stop => runner.stop(target).await,
        JobMode::Start => {
            runner.start(target).await?;
            for addr in &target.listens {
                probe::wait_until_listening(addr).await?;
            }
            Ok(())
        }
    }
}

/// Run a command to completion, capturing output.
///
/// On a non-success exit the error carries the exit status and, when the
/// process produced any, its combined stdout and stderr on the following
/// lines.
pub(crate) async fn combined_output(cmd: &mut Command) -> Result<std::process::Output> {
    let output = cmd.output().await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(failure_from_output(&output))
    }
}

pub(crate) fn failure_from_output(output: &std::process::Output) -> anyhow::Error {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim_end();
    if combined.is_empty() {
        anyhow!("{}", output.status)
    } else {
        anyhow!("{}\n{}", output.status, combined)
    }
}
