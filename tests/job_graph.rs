mod common;

use std::time::Instant;

use doo::dag::{JobMode, JobSet};

use common::{target, valid_catalog};

#[test]
fn diamond_dependencies_create_one_job_per_target() {
    let catalog = valid_catalog(vec![
        target("base").command("x").build(),
        target("left").command("x").depends_on("base").build(),
        target("right").command("x").depends_on("base").build(),
        target("top")
            .command("x")
            .depends_on("left")
            .depends_on("right")
            .build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("top");

    assert_eq!(jobs.len(), 4);
    assert_eq!(jobs.job("top").unwrap().dependency_count, 2);
    assert_eq!(jobs.job("left").unwrap().dependency_count, 1);
    assert_eq!(jobs.job("right").unwrap().dependency_count, 1);

    let base = jobs.job("base").unwrap();
    assert_eq!(base.dependency_count, 0);
    assert_eq!(base.dependents.len(), 2);
}

#[test]
fn requesting_a_root_twice_changes_nothing() {
    let catalog = valid_catalog(vec![
        target("a").command("x").build(),
        target("b").command("x").depends_on("a").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("b");
    jobs.create_start_job("b");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs.job("b").unwrap().dependency_count, 1);
}

#[test]
fn stop_jobs_wait_on_dependants() {
    // c depends on b depends on a; stopping a must stop c, then b, then a.
    let catalog = valid_catalog(vec![
        target("a").command("x").build(),
        target("b").command("x").depends_on("a").build(),
        target("c").command("x").depends_on("b").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_stop_job("a");

    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs.job("a").unwrap().mode, JobMode::Stop);
    assert_eq!(jobs.job("a").unwrap().dependency_count, 1);
    assert_eq!(jobs.job("b").unwrap().dependency_count, 1);
    assert_eq!(jobs.job("c").unwrap().dependency_count, 0);
}

#[test]
fn only_flag_skips_dependency_edges() {
    let catalog = valid_catalog(vec![
        target("a").command("x").build(),
        target("b").command("x").depends_on("a").build(),
    ]);

    let mut jobs = JobSet::new(catalog, true);
    jobs.create_start_job("b");

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs.job("b").unwrap().dependency_count, 0);
    assert_eq!(jobs.next_ready(), Some("b".to_string()));
}

#[test]
fn completion_releases_dependents() {
    let catalog = valid_catalog(vec![
        target("a").command("x").build(),
        target("b").command("x").depends_on("a").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("b");

    assert_eq!(jobs.next_ready(), Some("a".to_string()));
    jobs.mark_dispatched("a", Instant::now());
    jobs.complete("a", Instant::now(), None);

    assert_eq!(jobs.job("b").unwrap().dependency_count, 0);
    assert_eq!(jobs.next_ready(), Some("b".to_string()));
}

#[test]
fn failed_completion_sets_the_error_flag() {
    let catalog = valid_catalog(vec![target("a").command("x").build()]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("a");
    jobs.mark_dispatched("a", Instant::now());
    jobs.complete("a", Instant::now(), Some(anyhow::anyhow!("boom")));

    assert!(jobs.did_error());
    assert!(jobs.job("a").unwrap().err.is_some());
}

#[test]
fn invokes_enqueue_start_jobs_after_completion() {
    let catalog = valid_catalog(vec![
        target("a").command("x").invokes("b").build(),
        target("b").command("x").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("a");
    assert_eq!(jobs.len(), 1);

    jobs.mark_dispatched("a", Instant::now());
    jobs.complete("a", Instant::now(), None);

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs.next_ready(), Some("b".to_string()));
}

#[test]
fn invoked_targets_bring_their_own_dependencies() {
    let catalog = valid_catalog(vec![
        target("a").command("x").invokes("b").build(),
        target("dep").command("x").build(),
        target("b").command("x").depends_on("dep").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("a");
    jobs.mark_dispatched("a", Instant::now());
    jobs.complete("a", Instant::now(), None);

    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs.job("b").unwrap().dependency_count, 1);
}

#[test]
fn invokes_fan_out_even_after_a_failure() {
    let catalog = valid_catalog(vec![
        target("a").command("x").invokes("b").build(),
        target("b").command("x").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("a");
    jobs.mark_dispatched("a", Instant::now());
    jobs.complete("a", Instant::now(), Some(anyhow::anyhow!("boom")));

    // The job exists, but the error flag keeps the scheduler from admitting it.
    assert_eq!(jobs.len(), 2);
    assert!(jobs.did_error());
}

#[test]
fn dependency_cycle_leaves_no_admissible_job() {
    let catalog = valid_catalog(vec![
        target("a").command("x").depends_on("b").build(),
        target("b").command("x").depends_on("a").build(),
    ]);

    let mut jobs = JobSet::new(catalog, false);
    jobs.create_start_job("a");

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs.next_ready(), None);
    assert!(!jobs.has_running_jobs());
    assert!(!jobs.has_completed());
}
