// src/report.rs

//! Human-readable progress lines.
//!
//! Three forms, all suppressed for no-op jobs:
//!
//! ```text
//! >> db starting
//! << db completed in 1.2s
//! !! db failed: <error>
//! ```
//!
//! Target names are printed bold.

use std::time::Duration;

use owo_colors::OwoColorize;

use crate::dag::{Job, JobMode};

#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn start(&self, job: &Job) {
        if job.is_noop() {
            return;
        }
        let action = match job.mode {
            JobMode::Start => "starting",
            JobMode::Stop => "stopping",
        };
        println!(">> {} {}", job.target.name.bold(), action);
    }

    pub fn complete(&self, job: &Job) {
        if job.is_noop() {
            return;
        }
        let dur = job.duration().unwrap_or_default();
        println!(
            "<< {} completed in {}",
            job.target.name.bold(),
            pretty_duration(dur)
        );
        if let Some(err) = &job.err {
            println!("!! {} failed: {}", job.target.name.bold(), err);
        }
    }
}

/// Format a duration with the largest unit that yields a value >= 1, to
/// three significant digits: `2m3.5s`, `1.23s`, `45.6ms`, `789µs`, `12ns`.
pub fn pretty_duration(dur: Duration) -> String {
    const MINUTE: Duration = Duration::from_secs(60);

    if dur >= MINUTE {
        let mins = dur.as_secs() / 60;
        let secs = (dur - MINUTE * mins as u32).as_secs_f64();
        format!("{mins}m{}s", sig3(secs))
    } else if dur >= Duration::from_secs(1) {
        format!("{}s", sig3(dur.as_secs_f64()))
    } else if dur >= Duration::from_millis(1) {
        format!("{}ms", sig3(dur.as_secs_f64() * 1e3))
    } else if dur >= Duration::from_micros(1) {
        format!("{}µs", sig3(dur.as_secs_f64() * 1e6))
    } else {
        format!("{}ns", dur.as_nanos())
    }
}

/// Three significant digits, trailing zeros trimmed.
fn sig3(v: f64) -> String {
    let s = if v >= 100.0 {
        format!("{v:.0}")
    } else if v >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    };
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
