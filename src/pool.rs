// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The public facade. `Pool` owns the task list, binds a cache provider
//! and an executor, and exposes a single `run` operation. `PoolBuilder`
//! mirrors the teacher's `RuntimeBuilder`: it separates "what tasks exist"
//! from "how they're executed" so a caller can swap the cache backend or
//! the executor strategy without touching task definitions.

use crate::cache::{CacheProvider, SqliteCache, DEFAULT_CACHE_PATH};
use crate::config;
use crate::engine::{ParallelExecutor, SerialExecutor};
use crate::errors::EngineError;
use crate::payload::Payload;
use crate::traits::{Executor, Task};
use std::sync::Arc;

/// Owns an immutable, deep-copied task list for the lifetime of the pool.
/// `Arc<dyn Task>` cloning is the "deep copy" spec.md's rationale asks
/// for: tasks carry no mutable fields of their own, so a shared `Arc`
/// can't leak state between concurrent pools the way a shared mutable
/// task object could — per-run status lives only in the executor's own
/// coordinator state (`engine::parallel::TaskState`), never on the task.
pub struct Pool {
    tasks: Vec<Arc<dyn Task>>,
    executor: Arc<dyn Executor>,
}

impl Pool {
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    /// Run every task in the pool to completion, returning the final
    /// accumulated payload. Fails fast on the first fatal error; partial
    /// payload results are always discarded, per spec.md §7.
    pub async fn run(&self) -> Result<Payload, EngineError> {
        self.executor.run(&self.tasks).await
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Which concrete executor a pool should drive tasks with.
pub enum ExecutorKind {
    Serial,
    Parallel,
    ParallelWithConcurrency(usize),
}

pub struct PoolBuilder {
    tasks: Vec<Arc<dyn Task>>,
    cache: Option<Arc<dyn CacheProvider>>,
    executor_kind: ExecutorKind,
    verify_cache: bool,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            cache: None,
            executor_kind: ExecutorKind::Parallel,
            verify_cache: false,
        }
    }

    /// Replace the task list wholesale. Accepts the caller's `Vec` and
    /// clones nothing further — `Arc<dyn Task>` is already the deep-copy
    /// boundary described on [`Pool`].
    pub fn tasks(mut self, tasks: Vec<Arc<dyn Task>>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Bind an explicit cache provider. When omitted, `build` defaults to
    /// a [`SqliteCache`] at [`DEFAULT_CACHE_PATH`] ("cache.db" in the
    /// working directory), per spec.md §6.
    pub fn cache_provider(mut self, cache: Arc<dyn CacheProvider>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn executor(mut self, kind: ExecutorKind) -> Self {
        self.executor_kind = kind;
        self
    }

    /// Run the cache provider's self-check during `build`. Opt-in only —
    /// spec.md §4.2 treats self-check as diagnostic, never implicit.
    pub fn verify_cache(mut self, verify: bool) -> Self {
        self.verify_cache = verify;
        self
    }

    pub fn build(self) -> Result<Pool, EngineError> {
        config::validate_task_list(&self.tasks)?;

        let cache: Arc<dyn CacheProvider> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(SqliteCache::open(DEFAULT_CACHE_PATH)?),
        };

        if self.verify_cache {
            let ok = cache.self_check()?;
            if !ok {
                return Err(crate::errors::CacheError::BackendFailure(
                    "self-check failed".to_string(),
                )
                .into());
            }
        }

        let executor: Arc<dyn Executor> = match self.executor_kind {
            ExecutorKind::Serial => Arc::new(SerialExecutor::new(Some(cache))),
            ExecutorKind::Parallel => Arc::new(ParallelExecutor::new(Some(cache))),
            ExecutorKind::ParallelWithConcurrency(n) => {
                Arc::new(ParallelExecutor::with_max_concurrency(Some(cache), n))
            }
        };

        Ok(Pool {
            tasks: self.tasks,
            executor,
        })
    }

    /// Build without binding any cache provider at all — every task runs
    /// uncached regardless of its own `cache_enabled()` flag, since the
    /// execution wrapper treats "no provider bound" the same as "cache
    /// disabled" (spec.md §4.3, branch 1).
    pub fn build_uncached(self) -> Result<Pool, EngineError> {
        config::validate_task_list(&self.tasks)?;

        let executor: Arc<dyn Executor> = match self.executor_kind {
            ExecutorKind::Serial => Arc::new(SerialExecutor::new(None)),
            ExecutorKind::Parallel => Arc::new(ParallelExecutor::new(None)),
            ExecutorKind::ParallelWithConcurrency(n) => {
                Arc::new(ParallelExecutor::with_max_concurrency(None, n))
            }
        };

        Ok(Pool {
            tasks: self.tasks,
            executor,
        })
    }
}
