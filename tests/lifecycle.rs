//! Lifecycle behavior: single-use runs, resume, re-sourcing, and the
//! freeze/unfreeze gate.

use lazypipe::collectors::{count, find_first, sum, to_vec};
use lazypipe::operators::{distinct, filter, limit, map, skip, sorted_by};
use lazypipe::{LazyPipeline, PipelineError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_collect_twice_without_resume_fails() {
    init_tracing();
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    pipeline.add(map(|n: i32| n + 1)).unwrap();

    assert_eq!(pipeline.to_vec().unwrap(), vec![2, 3, 4]);
    assert!(pipeline.is_terminated());
    assert!(matches!(
        pipeline.to_vec().unwrap_err(),
        PipelineError::AlreadyConsumed
    ));
}

#[test]
fn test_resume_allows_a_second_run() {
    init_tracing();
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    pipeline.add(map(|n: i32| n * 2)).unwrap();

    assert_eq!(pipeline.to_vec().unwrap(), vec![2, 4, 6]);
    pipeline.resume();
    assert!(!pipeline.is_terminated());
    assert_eq!(pipeline.to_vec().unwrap(), vec![2, 4, 6]);
}

#[test]
fn test_read_from_swaps_the_source() {
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    pipeline.add(map(|n: i32| n * 10)).unwrap();
    assert_eq!(pipeline.to_vec().unwrap(), vec![10, 20, 30]);

    pipeline.resume();
    pipeline.read_from([7, 8]);
    // Only the new source flows; nothing of the old one lingers.
    assert_eq!(pipeline.to_vec().unwrap(), vec![70, 80]);
}

#[test]
fn test_add_after_a_run_requires_unfreeze() {
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    pipeline.add(map(|n: i32| n + 1)).unwrap();
    pipeline.to_vec().unwrap();

    assert!(pipeline.is_frozen());
    assert!(matches!(
        pipeline.add(map(|n: i32| n * 2)).unwrap_err(),
        PipelineError::FrozenPipeline
    ));

    pipeline.unfreeze();
    pipeline.add(map(|n: i32| n * 2)).unwrap();
    pipeline.resume();
    assert_eq!(pipeline.to_vec().unwrap(), vec![4, 6, 8]);
}

#[test]
fn test_explicit_freeze_blocks_add_before_any_run() {
    let mut pipeline = LazyPipeline::from([1, 2, 3]);
    pipeline.freeze();
    assert!(matches!(
        pipeline.add(map(|n: i32| n + 1)).unwrap_err(),
        PipelineError::FrozenPipeline
    ));

    pipeline.unfreeze();
    pipeline.add(map(|n: i32| n + 1)).unwrap();
    assert_eq!(pipeline.to_vec().unwrap(), vec![2, 3, 4]);
}

#[test]
fn test_empty_source_flows_through_cleanly() {
    let mut pipeline = LazyPipeline::from(Vec::<i32>::new());
    pipeline.add(map(|n: i32| n + 1)).unwrap();
    assert_eq!(pipeline.to_vec().unwrap(), Vec::<i32>::new());
    assert_eq!(pipeline.stage_count(), 1);
}

#[test]
fn test_detached_stage_skips_again_after_resume() {
    // skip splices itself out mid-run; resume must re-attach it so the next
    // run skips again.
    let mut pipeline = LazyPipeline::from([0, 2, 1, 5, 4, 6, 8]);
    pipeline.add(skip::<i32>(3)).unwrap();
    assert_eq!(pipeline.to_vec().unwrap(), vec![5, 4, 6, 8]);

    pipeline.resume();
    pipeline.read_from([9, 9, 9, 1, 2]);
    assert_eq!(pipeline.to_vec().unwrap(), vec![1, 2]);
}

#[test]
fn test_terminated_run_resumes_cleanly() {
    let mut pipeline = LazyPipeline::from([1, 2, 3, 4, 5, 6]);
    let found = pipeline.collect(find_first(|n: &i32| *n == 3)).unwrap();
    assert_eq!(found, Some(3));

    pipeline.resume();
    // A fresh terminal sees the whole source again.
    assert_eq!(pipeline.collect(count::<i32>()).unwrap(), 6);
}

#[test]
fn test_different_terminals_across_runs() {
    let mut pipeline = LazyPipeline::from([3, 1, 2]);
    assert_eq!(pipeline.collect(sum::<i32>()).unwrap(), 6);

    pipeline.resume();
    assert_eq!(pipeline.collect(to_vec::<i32>()).unwrap(), vec![3, 1, 2]);
}

#[test]
fn test_full_chain_end_to_end() {
    init_tracing();
    let mut pipeline = LazyPipeline::from([2, 4, 5, 9, 6, 8, 10, 2, 4, 3]);
    pipeline
        .add(map(|n: i32| n + 1))
        .unwrap()
        .add(distinct::<i32>())
        .unwrap()
        .add(sorted_by(|a: &i32, b: &i32| b.cmp(a)))
        .unwrap()
        .add(limit::<i32>(3))
        .unwrap();

    assert_eq!(pipeline.to_vec().unwrap(), vec![11, 10, 9]);
}

#[test]
fn test_end_to_end_rerun_with_filtering() {
    let mut pipeline = LazyPipeline::from(1..=10);
    pipeline
        .add(filter(|n: &i32| n % 2 == 0))
        .unwrap()
        .add(map(|n: i32| n * n))
        .unwrap();

    assert_eq!(pipeline.to_vec().unwrap(), vec![4, 16, 36, 64, 100]);

    pipeline.resume();
    pipeline.read_from(1..=4);
    assert_eq!(pipeline.to_vec().unwrap(), vec![4, 16]);
}
