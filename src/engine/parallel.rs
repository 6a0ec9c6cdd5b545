// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The multi-worker scheduler: a coordinator owns all mutable scheduling
//! state (payload, task status, in-flight handles); workers only ever see
//! the subset of the payload their task declared and hand back a fragment.
//! No shared mutable state between workers — isolation is OS-thread-level
//! (`tokio::task::spawn_blocking`) rather than the reference
//! implementation's separate-process model, since `Task: Send + Sync`
//! already gives the compiler-enforced guarantee process isolation exists
//! to approximate by other means.

use crate::cache::CacheProvider;
use crate::engine::wrapper;
use crate::errors::{EngineError, ExecutionError, RunError};
use crate::observability::messages::engine::{
    CacheLookup, RunCompleted, RunFailed, RunStarted, TaskCompleted, TaskDispatched, TaskFailed,
};
use crate::observability::messages::StructuredLog;
use crate::payload::{Fragment, Payload};
use crate::traits::{Executor, Task};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, PartialEq, Eq)]
enum TaskState {
    NotStarted,
    Running,
    Done,
}

/// A fixed-size worker pool is implicit in `tokio`'s blocking-thread pool;
/// `max_concurrency` bounds how many tasks this run keeps in flight at
/// once, independent of the runtime's own thread budget.
pub struct ParallelExecutor {
    cache: Option<Arc<dyn CacheProvider>>,
    max_concurrency: usize,
}

impl ParallelExecutor {
    /// `max_concurrency` defaults to host parallelism.
    pub fn new(cache: Option<Arc<dyn CacheProvider>>) -> Self {
        let max_concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            cache,
            max_concurrency,
        }
    }

    pub fn with_max_concurrency(cache: Option<Arc<dyn CacheProvider>>, max_concurrency: usize) -> Self {
        Self {
            cache,
            max_concurrency: max_concurrency.max(1),
        }
    }
}

fn is_ready(task: &dyn Task, payload: &Payload) -> bool {
    task.parameter_names().iter().all(|name| payload.contains_key(name))
}

fn merge_into(payload: &mut Payload, fragment: Fragment, producer: &str) -> Result<(), RunError> {
    payload
        .merge_fragment(fragment)
        .map_err(|key| RunError::DuplicateOutput {
            key,
            producer: producer.to_string(),
        })
}

#[async_trait]
impl Executor for ParallelExecutor {
    async fn run(&self, tasks: &[Arc<dyn Task>]) -> Result<Payload, EngineError> {
        let start = Instant::now();
        RunStarted {
            strategy: "parallel",
            task_count: tasks.len(),
        }
        .log();

        let mut status = vec![TaskState::NotStarted; tasks.len()];
        let mut payload = Payload::new();
        let mut inflight: JoinSet<(usize, Result<serde_json::Value, anyhow::Error>)> = JoinSet::new();
        let mut pending_inputs: HashMap<usize, Payload> = HashMap::new();
        let cancellation = CancellationToken::new();

        loop {
            // Ready-scan with cascading cache hits: a hit restarts the scan
            // because other tasks may have just become ready; a miss is
            // dispatched and the scan continues without restarting.
            let mut dispatched_this_pass = false;
            'scan: loop {
                if cancellation.is_cancelled() {
                    break 'scan;
                }
                for (i, task) in tasks.iter().enumerate() {
                    if status[i] != TaskState::NotStarted || !is_ready(task.as_ref(), &payload) {
                        continue;
                    }
                    if inflight.len() >= self.max_concurrency {
                        continue;
                    }

                    let inputs = payload.project(task.parameter_names());
                    let hit = wrapper::cache_hit(task.as_ref(), &inputs, self.cache.as_deref())?;
                    CacheLookup {
                        task: task.name(),
                        hit: hit.is_some(),
                    }
                    .log();

                    if let Some(fragment) = hit {
                        merge_into(&mut payload, fragment, task.name()).map_err(|err| {
                            cancellation.cancel();
                            EngineError::from(err)
                        })?;
                        status[i] = TaskState::Done;
                        dispatched_this_pass = true;
                        continue 'scan;
                    }

                    TaskDispatched { task: task.name() }.log();
                    status[i] = TaskState::Running;
                    dispatched_this_pass = true;
                    pending_inputs.insert(i, inputs.clone());

                    let task_clone = Arc::clone(task);
                    inflight.spawn(async move {
                        let result = tokio::task::spawn_blocking(move || task_clone.execute(&inputs)).await;
                        match result {
                            Ok(body_result) => (i, body_result),
                            Err(join_err) => (i, Err(anyhow::anyhow!("worker thread panicked: {join_err}"))),
                        }
                    });
                }
                break;
            }

            if inflight.is_empty() && !dispatched_this_pass {
                break;
            }

            let Some(joined) = inflight.join_next().await else {
                continue;
            };
            let (i, body_result) = joined.map_err(|join_err| {
                EngineError::from(ExecutionError::Internal(format!(
                    "coordinator task panicked: {join_err}"
                )))
            })?;
            let task = &tasks[i];
            let inputs = pending_inputs.remove(&i).expect("dispatched task has recorded inputs");

            let outcome = body_result
                .map_err(|source| ExecutionError::WorkerFailure {
                    task: task.name().to_string(),
                    source,
                })
                .and_then(|value| wrapper::validate_shape(task.name(), value));

            let fragment = match outcome {
                Ok(fragment) => fragment,
                Err(err) => {
                    TaskFailed {
                        task: task.name(),
                        reason: &err.to_string(),
                    }
                    .log();
                    cancellation.cancel();
                    while inflight.join_next().await.is_some() {}
                    return Err(err.into());
                }
            };

            if let Err(err) = merge_into(&mut payload, fragment.clone(), task.name()) {
                RunFailed { reason: &err.to_string() }.log();
                cancellation.cancel();
                while inflight.join_next().await.is_some() {}
                return Err(err.into());
            }
            status[i] = TaskState::Done;
            wrapper::store(task.as_ref(), &inputs, &fragment, self.cache.as_deref())?;
            TaskCompleted { task: task.name() }.log();
        }

        if let Some(i) = status.iter().position(|s| *s == TaskState::NotStarted) {
            let task = &tasks[i];
            let parameter = task
                .parameter_names()
                .iter()
                .find(|name| !payload.contains_key(*name))
                .cloned()
                .unwrap_or_else(|| "<unresolved>".to_string());
            let err = RunError::MissingProducer {
                task: task.name().to_string(),
                parameter,
            };
            RunFailed { reason: &err.to_string() }.log();
            return Err(err.into());
        }

        RunCompleted {
            strategy: "parallel",
            task_count: tasks.len(),
            duration: start.elapsed(),
        }
        .log();
        Ok(payload)
    }
}
