// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The single-threaded topological driver: iterate the task list in the
//! order it was given, failing fast the moment a task's declared parameter
//! was never produced.

use crate::cache::CacheProvider;
use crate::engine::wrapper;
use crate::errors::{EngineError, RunError};
use crate::observability::messages::engine::{RunFailed, RunStarted, TaskCompleted, TaskDispatched};
use crate::observability::messages::StructuredLog;
use crate::payload::Payload;
use crate::traits::{Executor, Task};
use async_trait::async_trait;
use std::sync::Arc;

/// Simplest correct baseline: no reordering, no concurrency. The caller's
/// task order must already be a valid topological order for this executor
/// to succeed — that's by design, not a limitation to work around.
pub struct SerialExecutor {
    cache: Option<Arc<dyn CacheProvider>>,
}

impl SerialExecutor {
    pub fn new(cache: Option<Arc<dyn CacheProvider>>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Executor for SerialExecutor {
    async fn run(&self, tasks: &[Arc<dyn Task>]) -> Result<Payload, EngineError> {
        RunStarted {
            strategy: "serial",
            task_count: tasks.len(),
        }
        .log();

        let mut payload = Payload::new();
        for task in tasks {
            let missing = task
                .parameter_names()
                .iter()
                .find(|name| !payload.contains_key(name));
            if let Some(parameter) = missing {
                let err = RunError::MissingProducer {
                    task: task.name().to_string(),
                    parameter: parameter.clone(),
                };
                RunFailed { reason: &err.to_string() }.log();
                return Err(err.into());
            }

            TaskDispatched { task: task.name() }.log();
            let inputs = payload.project(task.parameter_names());
            let outcome = wrapper::invoke(task.as_ref(), &inputs, self.cache.as_deref())?;
            TaskCompleted { task: task.name() }.log();

            let fragment = outcome.into_fragment();
            let producer = task.name().to_string();
            payload.merge_fragment(fragment).map_err(|key| {
                let err = RunError::DuplicateOutput { key, producer };
                RunFailed { reason: &err.to_string() }.log();
                err
            })?;
        }

        Ok(payload)
    }
}
