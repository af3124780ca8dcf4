// src/exec/launchd.rs

use std::process::Output;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::debug;

use crate::catalog::Target;
use crate::exec::probe::exp_sleep;
use crate::exec::{combined_output, failure_from_output, Runner};

// Raw launchctl wait statuses with a meaning beyond pass/fail. These are
// platform artifacts observed from `launchctl` on macOS.
//
// bootstrap: service already loaded (success for our purposes).
pub const STATUS_SERVICE_ALREADY_LOADED: i32 = 34048;
// bootout: operation now in progress (transient; retry).
pub const STATUS_OPERATION_IN_PROGRESS: i32 = 9216;
// bootout: no such process (already unloaded; success).
pub const STATUS_NO_SUCH_PROCESS: i32 = 768;

/// Transport to the host service manager.
///
/// The production implementation shells out to `launchctl`/`defaults`;
/// tests substitute a scripted one so the retry and status-code handling in
/// [`Launchd`] can be exercised without a macOS host.
#[async_trait]
pub trait Launchctl: Send + Sync {
    /// Read the service label out of a plist file.
    async fn read_label(&self, plist: &str) -> Result<String>;
    async fn bootstrap(&self, domain: &str, plist: &str) -> Result<Output>;
    async fn bootout(&self, domain: &str) -> Result<Output>;
}

/// The real `launchctl` on the host.
pub struct HostLaunchctl;

#[async_trait]
impl Launchctl for HostLaunchctl {
    async fn read_label(&self, plist: &str) -> Result<String> {
        let mut cmd = Command::new("defaults");
        cmd.args(["read", plist, "Label"]);
        let output = combined_output(&mut cmd)
            .await
            .with_context(|| format!("reading Label from {plist}"))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn bootstrap(&self, domain: &str, plist: &str) -> Result<Output> {
        let mut cmd = Command::new("launchctl");
        cmd.args(["bootstrap", domain]).arg(plist);
        cmd.output().await.context("spawning launchctl bootstrap")
    }

    async fn bootout(&self, domain: &str) -> Result<Output> {
        let mut cmd = Command::new("launchctl");
        cmd.args(["bootout", domain]);
        cmd.output().await.context("spawning launchctl bootout")
    }
}

/// Service-manager semantics over any [`Launchctl`] transport. The target's
/// command is the path to a service plist; start bootstraps it into the
/// user's GUI domain and stop boots it out by label.
pub struct Launchd<C> {
    ctl: C,
}

impl<C: Launchctl> Launchd<C> {
    pub fn new(ctl: C) -> Self {
        Self { ctl }
    }

    /// The underlying transport; scripted transports expose their recorded
    /// calls through this.
    pub fn ctl(&self) -> &C {
        &self.ctl
    }

    pub async fn start(&self, target: &Target) -> Result<()> {
        let domain = format!("gui/{}", current_uid());
        let output = self.ctl.bootstrap(&domain, &target.command).await?;

        if output.status.success()
            || raw_wait_status(&output.status) == Some(STATUS_SERVICE_ALREADY_LOADED)
        {
            return Ok(());
        }
        Err(failure_from_output(&output))
    }

    pub async fn stop(&self, target: &Target) -> Result<()> {
        let label = self.ctl.read_label(&target.command).await?;
        let domain = format!("gui/{}/{}", current_uid(), label);

        let mut attempt = 0;
        loop {
            let output = self.ctl.bootout(&domain).await?;
            if output.status.success() {
                return Ok(());
            }

            match raw_wait_status(&output.status) {
                Some(STATUS_OPERATION_IN_PROGRESS) => {
                    debug!(%domain, attempt, "bootout in progress; retrying");
                    sleep(exp_sleep(attempt)).await;
                    attempt += 1;
                }
                Some(STATUS_NO_SUCH_PROCESS) => return Ok(()),
                _ => return Err(failure_from_output(&output)),
            }
        }
    }
}

/// Registry-facing backend wired to the host service manager.
pub struct LaunchdRunner;

#[async_trait]
impl Runner for LaunchdRunner {
    async fn start(&self, target: &Target) -> Result<()> {
        Launchd::new(HostLaunchctl).start(target).await
    }

    async fn stop(&self, target: &Target) -> Result<()> {
        Launchd::new(HostLaunchctl).stop(target).await
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    unsafe { libc::getuid() }
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

#[cfg(unix)]
fn raw_wait_status(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    Some(status.into_raw())
}

#[cfg(not(unix))]
fn raw_wait_status(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
