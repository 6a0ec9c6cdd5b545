// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end scenarios S1-S6 from spec.md §8, run against both executors
//! wherever a scenario doesn't call out one specifically, to cover
//! "merge-equivalence" (testable property 3) incidentally.

use dagflow::cache::CacheProvider;
use dagflow::{CacheError, ClosureTask, EngineError, ExecutorKind, Pool, RunError, Task};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn producer(name: &str, output: serde_json::Value) -> Arc<dyn Task> {
    Arc::new(ClosureTask::new(name, vec![], move |_| Ok(output.clone())))
}

async fn run_both_executors(tasks: Vec<Arc<dyn Task>>) -> (dagflow::Payload, dagflow::Payload) {
    let serial = Pool::builder()
        .tasks(tasks.clone())
        .executor(ExecutorKind::Serial)
        .build_uncached()
        .unwrap();
    let parallel = Pool::builder()
        .tasks(tasks)
        .executor(ExecutorKind::Parallel)
        .build_uncached()
        .unwrap();

    (serial.run().await.unwrap(), parallel.run().await.unwrap())
}

#[tokio::test]
async fn s1_linear() {
    let tasks: Vec<Arc<dyn Task>> = vec![
        producer("t1", json!({ "a": 1, "b": 2 })),
        Arc::new(ClosureTask::new(
            "t2",
            vec!["a".into(), "b".into()],
            |inputs| {
                let a = inputs.get("a").unwrap().as_i64().unwrap();
                let b = inputs.get("b").unwrap().as_i64().unwrap();
                Ok(json!({ "c": a + b }))
            },
        )),
        Arc::new(ClosureTask::new("t3", vec!["c".into()], |_| {
            Ok(serde_json::Value::Null)
        })),
    ];

    let (serial_payload, parallel_payload) = run_both_executors(tasks).await;
    for payload in [&serial_payload, &parallel_payload] {
        assert_eq!(payload.get("a"), Some(&json!(1)));
        assert_eq!(payload.get("b"), Some(&json!(2)));
        assert_eq!(payload.get("c"), Some(&json!(3)));
    }
}

#[tokio::test]
async fn s2_diamond() {
    let tasks: Vec<Arc<dyn Task>> = vec![
        producer("t1", json!({ "a": 1, "b": 2 })),
        Arc::new(ClosureTask::new("t2", vec!["a".into(), "b".into()], |_| {
            Ok(json!({ "c": 3 }))
        })),
        Arc::new(ClosureTask::new("t3", vec!["c".into()], |_| {
            Ok(json!({ "d": 4 }))
        })),
        Arc::new(ClosureTask::new("t4", vec!["c".into()], |_| {
            Ok(json!({ "e": 5 }))
        })),
        Arc::new(ClosureTask::new(
            "t5",
            vec!["a".into(), "b".into(), "d".into(), "e".into()],
            |_| Ok(json!({ "f": 12 })),
        )),
    ];

    let (serial_payload, parallel_payload) = run_both_executors(tasks).await;
    for payload in [&serial_payload, &parallel_payload] {
        assert_eq!(payload.get("a"), Some(&json!(1)));
        assert_eq!(payload.get("b"), Some(&json!(2)));
        assert_eq!(payload.get("c"), Some(&json!(3)));
        assert_eq!(payload.get("d"), Some(&json!(4)));
        assert_eq!(payload.get("e"), Some(&json!(5)));
        assert_eq!(payload.get("f"), Some(&json!(12)));
    }
}

#[tokio::test]
async fn s3_missing_producer() {
    let tasks: Vec<Arc<dyn Task>> = vec![
        producer("t1", json!({ "a": 1, "b": 2 })),
        Arc::new(ClosureTask::new("t2", vec!["a".into(), "b".into()], |_| {
            Ok(json!({ "c": 3 }))
        })),
        Arc::new(ClosureTask::new("t5", vec!["un_given".into()], |_| {
            Ok(serde_json::Value::Null)
        })),
    ];

    for kind in [ExecutorKind::Serial, ExecutorKind::Parallel] {
        let pool = Pool::builder()
            .tasks(tasks.clone())
            .executor(kind)
            .build_uncached()
            .unwrap();
        let err = pool.run().await.unwrap_err();
        match err {
            EngineError::Run(run_error) => {
                assert!(run_error.to_string().contains("un_given"));
            }
            other => panic!("expected a RunError, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn s4_cache_hit_skips_side_effect() {
    let dir = tempfile::tempdir().unwrap();
    let sentinel = dir.path().join("tmp");
    let sentinel_clone = sentinel.clone();

    let t1: Arc<dyn Task> = Arc::new(ClosureTask::new("t1", vec![], move |_| {
        std::fs::write(&sentinel_clone, b"touched").unwrap();
        Ok(json!({ "a": 1, "b": 2 }))
    }));
    let t2: Arc<dyn Task> = Arc::new(ClosureTask::new("t2", vec!["a".into(), "b".into()], |_| {
        Ok(json!({ "c": 3 }))
    }));

    let cache = Arc::new(dagflow::cache::InMemoryCache::new());

    let pool1 = Pool::builder()
        .tasks(vec![t1.clone(), t2.clone()])
        .cache_provider(cache.clone())
        .build()
        .unwrap();
    let payload1 = pool1.run().await.unwrap();
    assert!(sentinel.exists());
    assert_eq!(payload1.get("a"), Some(&json!(1)));

    std::fs::remove_file(&sentinel).unwrap();

    let pool2 = Pool::builder()
        .tasks(vec![t1, t2])
        .cache_provider(cache)
        .build()
        .unwrap();
    let payload2 = pool2.run().await.unwrap();

    assert!(!sentinel.exists());
    assert_eq!(payload2.get("a"), Some(&json!(1)));
    assert_eq!(payload2.get("b"), Some(&json!(2)));
    assert_eq!(payload2.get("c"), Some(&json!(3)));
}

#[tokio::test]
async fn s5_duplicate_output() {
    let tasks: Vec<Arc<dyn Task>> =
        vec![producer("t1", json!({ "a": 1 })), producer("t1b", json!({ "a": 2 }))];

    for kind in [ExecutorKind::Serial, ExecutorKind::Parallel] {
        let pool = Pool::builder()
            .tasks(tasks.clone())
            .executor(kind)
            .build_uncached()
            .unwrap();
        let err = pool.run().await.unwrap_err();
        assert!(matches!(err, EngineError::Run(RunError::DuplicateOutput { .. })));
    }
}

#[tokio::test]
async fn s6_parallel_speedup() {
    let tasks: Vec<Arc<dyn Task>> = vec![
        producer("start", json!({ "start": true })),
        Arc::new(ClosureTask::new("chain", vec!["start".into()], |_| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(json!({ "mid": true }))
        })),
        Arc::new(ClosureTask::new("c", vec!["mid".into()], |_| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(json!({ "c": true }))
        })),
        Arc::new(ClosureTask::new("d", vec!["mid".into()], |_| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(json!({ "d": true }))
        })),
    ];

    let pool = Pool::builder()
        .tasks(tasks)
        .executor(ExecutorKind::Parallel)
        .build_uncached()
        .unwrap();

    let started = Instant::now();
    pool.run().await.unwrap();
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_millis(1800),
        "expected c/d to overlap, took {elapsed:?}"
    );
}

#[tokio::test]
async fn cache_self_check_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(dagflow::cache::SqliteCache::open(dir.path().join("cache.db")).unwrap());
    let result = Pool::builder()
        .tasks(vec![producer("t1", json!({ "a": 1 }))])
        .cache_provider(cache)
        .verify_cache(true)
        .build();
    assert!(result.is_ok());
}

#[tokio::test]
async fn cache_idempotence_runs_body_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let t1: Arc<dyn Task> = Arc::new(ClosureTask::new("t1", vec![], move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "a": 1 }))
    }));

    let cache = Arc::new(dagflow::cache::InMemoryCache::new());
    for _ in 0..2 {
        let pool = Pool::builder()
            .tasks(vec![t1.clone()])
            .cache_provider(cache.clone())
            .build()
            .unwrap();
        pool.run().await.unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bad_argument_on_negative_retain() {
    let cache = dagflow::cache::InMemoryCache::new();
    let err = cache.clear(-1).unwrap_err();
    assert!(matches!(err, CacheError::BadArgument(_)));
}
