// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::catalog::{Catalog, Target};
use crate::dag::job::{Job, JobMode};

/// The job graph for one run, plus the admission bookkeeping the scheduler
/// loop drives.
///
/// Jobs are memoized by target name: each target gets at most one job per
/// run no matter how many paths reach it. Start jobs wait on their target's
/// dependencies; stop jobs wait on its dependants. All state here is owned
/// and mutated by the controller only; workers never see it.
pub struct JobSet {
    catalog: Arc<Catalog>,
    jobs: HashMap<String, Job>,
    ignore_dependencies: bool,
    started_jobs: usize,
    completed_jobs: usize,
    did_error: bool,
    exclusive_running: bool,
}

impl JobSet {
    pub fn new(catalog: Arc<Catalog>, ignore_dependencies: bool) -> Self {
        Self {
            catalog,
            jobs: HashMap::new(),
            ignore_dependencies,
            started_jobs: 0,
            completed_jobs: 0,
            did_error: false,
            exclusive_running: false,
        }
    }

    /// Create the start job for `name` and, transitively, for each of its
    /// dependencies, recording a prerequisite edge per dependency. A second
    /// request for the same target returns without touching the graph.
    pub fn create_start_job(&mut self, name: &str) {
        if self.jobs.contains_key(name) {
            return;
        }

        let Some(target) = self.catalog.get(name).cloned() else {
            // Validation makes catalog lookups total; an unknown name here
            // would mean a bad invokes edge slipped through.
            warn!(target = %name, "job requested for unknown target; ignoring");
            return;
        };

        self.jobs
            .insert(name.to_string(), Job::new(target.clone(), JobMode::Start));

        if self.ignore_dependencies {
            return;
        }

        for dep in &target.dependencies {
            self.create_start_job(dep);
            self.add_prerequisite(name, dep);
        }
    }

    /// Create the stop job for `name` and, transitively, for each of its
    /// dependants: whatever depends on a target must stop before it does.
    pub fn create_stop_job(&mut self, name: &str) {
        if self.jobs.contains_key(name) {
            return;
        }

        let Some(target) = self.catalog.get(name).cloned() else {
            warn!(target = %name, "job requested for unknown target; ignoring");
            return;
        };

        self.jobs
            .insert(name.to_string(), Job::new(target.clone(), JobMode::Stop));

        if self.ignore_dependencies {
            return;
        }

        for dependant in &target.dependants {
            self.create_stop_job(dependant);
            self.add_prerequisite(name, dependant);
        }
    }

    /// Record that `waiting` cannot run until `prerequisite` has completed.
    fn add_prerequisite(&mut self, waiting: &str, prerequisite: &str) {
        if let Some(job) = self.jobs.get_mut(waiting) {
            job.dependency_count += 1;
        }
        if let Some(job) = self.jobs.get_mut(prerequisite) {
            job.dependents.push(waiting.to_string());
        }
    }

    /// The admission gate: pick a job that may be dispatched now, if any.
    ///
    /// A job is admissible when it has not been dispatched, all its
    /// prerequisites have completed, and exclusivity permits: an exclusive
    /// job needs the in-flight set empty, and nothing is admitted while an
    /// exclusive job runs.
    pub fn next_ready(&self) -> Option<String> {
        if self.exclusive_running {
            return None;
        }

        self.jobs
            .values()
            .find(|job| {
                job.started_at.is_none()
                    && job.dependency_count == 0
                    && !(job.target.is_exclusive() && self.has_running_jobs())
            })
            .map(|job| job.target.name.clone())
    }

    /// Stamp a job as dispatched and hand back what its worker needs.
    pub fn mark_dispatched(&mut self, name: &str, at: Instant) -> Option<(Arc<Target>, JobMode)> {
        let job = self.jobs.get_mut(name)?;
        job.started_at = Some(at);
        self.started_jobs += 1;
        if job.target.is_exclusive() {
            self.exclusive_running = true;
        }
        debug!(target = %name, mode = ?job.mode, "job dispatched");
        Some((job.target.clone(), job.mode))
    }

    /// Record a completion event: stamp the job terminal, release its
    /// dependents, note any error, and enqueue the target's `invokes`
    /// fan-out for start runs.
    pub fn complete(&mut self, name: &str, at: Instant, err: Option<anyhow::Error>) {
        let Some(job) = self.jobs.get_mut(name) else {
            warn!(target = %name, "completion for unknown job; ignoring");
            return;
        };

        job.completed_at = Some(at);
        job.err = err;
        self.completed_jobs += 1;

        if job.target.is_exclusive() {
            self.exclusive_running = false;
        }
        if job.err.is_some() {
            self.did_error = true;
        }

        let mode = job.mode;
        let dependents = job.dependents.clone();
        let invokes = job.target.invokes.clone();

        for dependent in &dependents {
            if let Some(other) = self.jobs.get_mut(dependent) {
                other.dependency_count -= 1;
            }
        }

        // Post-start fan-out happens whether or not the job errored; the
        // admission stop after an error keeps the new jobs from dispatching.
        if mode == JobMode::Start {
            for inv in &invokes {
                self.create_start_job(inv);
            }
        }

        debug!(target = %name, "job completed");
    }

    pub fn has_running_jobs(&self) -> bool {
        self.started_jobs > self.completed_jobs
    }

    pub fn has_completed(&self) -> bool {
        self.completed_jobs == self.jobs.len()
    }

    pub fn did_error(&self) -> bool {
        self.did_error
    }

    pub fn started_jobs(&self) -> usize {
        self.started_jobs
    }

    pub fn completed_jobs(&self) -> usize {
        self.completed_jobs
    }

    pub fn is_exclusive_running(&self) -> bool {
        self.exclusive_running
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.get(name)
    }
}
