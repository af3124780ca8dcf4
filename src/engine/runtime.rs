// src/engine/runtime.rs

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dag::JobSet;
use crate::exec;
use crate::report::Reporter;

/// One worker's terminal report, sent exactly once per dispatched job.
struct Completion {
    name: String,
    completed_at: Instant,
    result: anyhow::Result<()>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// At least one job failed; admission was halted.
    pub did_error: bool,
    /// Every job in the graph reached a terminal state. False with
    /// `did_error` unset means the scheduler deadlocked.
    pub completed: bool,
    pub started_jobs: usize,
    pub completed_jobs: usize,
}

/// The scheduler: a single controller task driving the job graph.
///
/// All graph state lives in the [`JobSet`] and is touched only here. Each
/// dispatched job runs in its own spawned worker, which owns nothing but its
/// target handle and reports back over the completion channel.
pub struct Runtime {
    jobs: JobSet,
    reporter: Reporter,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Runtime {
    pub fn new(jobs: JobSet, reporter: Reporter) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            jobs,
            reporter,
            completion_tx,
            completion_rx,
        }
    }

    /// Drive the graph to its end.
    ///
    /// Loop: stop on the first observed error; stop when every job is
    /// terminal; otherwise dispatch the next admissible job, or block for
    /// one completion if something is in flight. No admissible job and
    /// nothing in flight with jobs remaining is a deadlock, reported
    /// through the summary.
    pub async fn run(mut self) -> RunSummary {
        loop {
            if self.jobs.did_error() {
                break;
            }
            if self.jobs.has_completed() {
                break;
            }

            if let Some(name) = self.jobs.next_ready() {
                self.dispatch(&name);
            } else if self.jobs.has_running_jobs() {
                match self.completion_rx.recv().await {
                    Some(done) => self.handle_completion(done),
                    None => {
                        // Unreachable while we hold a sender; bail rather
                        // than spin.
                        warn!("completion channel closed with jobs in flight");
                        break;
                    }
                }
            } else {
                debug!("no admissible job and none in flight; giving up");
                break;
            }
        }

        RunSummary {
            did_error: self.jobs.did_error(),
            completed: self.jobs.has_completed(),
            started_jobs: self.jobs.started_jobs(),
            completed_jobs: self.jobs.completed_jobs(),
        }
    }

    fn dispatch(&mut self, name: &str) {
        let Some((target, mode)) = self.jobs.mark_dispatched(name, Instant::now()) else {
            return;
        };

        if let Some(job) = self.jobs.job(name) {
            self.reporter.start(job);
        }

        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = exec::run_job(&target, mode).await;
            let _ = tx.send(Completion {
                name: target.name.clone(),
                completed_at: Instant::now(),
                result,
            });
        });
    }

    fn handle_completion(&mut self, done: Completion) {
        self.jobs
            .complete(&done.name, done.completed_at, done.result.err());
        if let Some(job) = self.jobs.job(&done.name) {
            self.reporter.complete(job);
        }
    }
}
