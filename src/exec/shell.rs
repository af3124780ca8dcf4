// src/exec/shell.rs

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::catalog::Target;
use crate::exec::Runner;

/// Foreground backend: runs the command line under `bash -c` in the
/// target's working directory, inheriting the controller's stdio. The
/// scheduler treats these targets as exclusive, so the terminal belongs to
/// the command until it exits.
pub struct ShellRunner;

#[async_trait]
impl Runner for ShellRunner {
    async fn start(&self, target: &Target) -> Result<()> {
        let mut cmd = Command::new("bash");
        cmd.arg("-c").arg(&target.command);
        if let Some(cwd) = &target.cwd {
            cmd.current_dir(cwd);
        }

        let status = cmd
            .status()
            .await
            .with_context(|| format!("spawning shell for target '{}'", target.name))?;

        if !status.success() {
            bail!("{status}");
        }
        Ok(())
    }

    /// Shell targets are one-shot foreground commands; there is nothing
    /// running afterwards to stop.
    async fn stop(&self, _target: &Target) -> Result<()> {
        Ok(())
    }
}
