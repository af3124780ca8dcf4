// src/exec/tmux.rs

use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use crate::catalog::Target;
use crate::exec::{combined_output, Runner};

/// Detached-session backend. Each target maps to a tmux session named after
/// it; starting an already-running session and stopping a missing one are
/// both successes, so runs are idempotent.
pub struct TmuxRunner;

async fn session_exists(name: &str) -> bool {
    Command::new("tmux")
        .args(["has-session", "-t", name])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

#[async_trait]
impl Runner for TmuxRunner {
    async fn start(&self, target: &Target) -> Result<()> {
        if session_exists(&target.name).await {
            return Ok(());
        }

        let mut cmd = Command::new("tmux");
        cmd.args(["new-session", "-d", "-s", &target.name]);
        if let Some(cwd) = &target.cwd {
            cmd.arg("-c").arg(cwd);
        }
        // Chain a second tmux command that types the command line into the
        // fresh session's first window.
        cmd.arg(";")
            .args(["send-keys", &target.command, "Enter"]);

        combined_output(&mut cmd).await?;
        Ok(())
    }

    async fn stop(&self, target: &Target) -> Result<()> {
        if !session_exists(&target.name).await {
            return Ok(());
        }

        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &target.name]);
        combined_output(&mut cmd).await?;
        Ok(())
    }
}
