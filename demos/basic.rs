// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runs the diamond-dependency scenario from spec.md S2 against a
//! temp-directory SQLite cache, twice, to show the second run short-circuit
//! every cache-enabled task.

use dagflow::{ClosureTask, ExecutorKind, Pool, Task};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn diamond_tasks() -> Vec<Arc<dyn Task>> {
    vec![
        Arc::new(ClosureTask::new("t1", vec![], |_| {
            Ok(json!({ "a": 1, "b": 2 }))
        })),
        Arc::new(ClosureTask::new(
            "t2",
            vec!["a".into(), "b".into()],
            |_| Ok(json!({ "c": 3 })),
        )),
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
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("cache.db");

    for run_number in 1..=2 {
        let pool = Pool::builder()
            .tasks(diamond_tasks())
            .cache_provider(Arc::new(dagflow::cache::SqliteCache::open(&db_path)?))
            .executor(ExecutorKind::Parallel)
            .build()?;

        let payload = pool.run().await?;
        println!("run {run_number}: f = {:?}", payload.get("f"));
    }

    Ok(())
}
