// src/dag/job.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::Target;

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    Start,
    Stop,
}

/// Execution record for one target in one run.
///
/// State transitions: `started_at == None` means never dispatched;
/// `started_at` set with `completed_at == None` means in flight; both set
/// means terminal.
#[derive(Debug)]
pub struct Job {
    pub target: Arc<Target>,
    pub mode: JobMode,
    /// Remaining unmet prerequisites; admissible at zero.
    pub dependency_count: usize,
    /// Names of jobs waiting on this one.
    pub dependents: Vec<String>,
    pub started_at: Option<Instant>,
    pub completed_at: Option<Instant>,
    pub err: Option<anyhow::Error>,
}

impl Job {
    pub fn new(target: Arc<Target>, mode: JobMode) -> Self {
        Self {
            target,
            mode,
            dependency_count: 0,
            dependents: Vec::new(),
            started_at: None,
            completed_at: None,
            err: None,
        }
    }

    /// A no-op job produces no external action and emits no log lines:
    /// stopping a `shell` target, or starting one with no command.
    pub fn is_noop(&self) -> bool {
        match self.mode {
            JobMode::Stop => self.target.runner == "shell",
            JobMode::Start => self.target.command.is_empty(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some(completed.duration_since(started)),
            _ => None,
        }
    }
}
