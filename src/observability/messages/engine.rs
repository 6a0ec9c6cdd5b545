// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine lifecycle events: run started/completed/failed, task
//! dispatched/completed, cache hit/miss.

use super::StructuredLog;
use std::fmt::{self, Display, Formatter};
use tracing::Span;

/// A run began against `task_count` tasks under the named strategy
/// (`"serial"` or `"parallel"`).
pub struct RunStarted {
    pub strategy: &'static str,
    pub task_count: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "starting {} run over {} tasks",
            self.strategy, self.task_count
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(strategy = self.strategy, task_count = self.task_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("run", span_name = name, strategy = self.strategy, task_count = self.task_count)
    }
}

pub struct RunCompleted {
    pub strategy: &'static str,
    pub task_count: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} run completed: {} tasks in {:?}",
            self.strategy, self.task_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            task_count = self.task_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            strategy = self.strategy,
            task_count = self.task_count,
            duration = ?self.duration,
        )
    }
}

pub struct RunFailed<'a> {
    pub reason: &'a str,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "run failed: {}", self.reason)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("run_failed", span_name = name, reason = self.reason)
    }
}

pub struct TaskDispatched<'a> {
    pub task: &'a str,
}

impl Display for TaskDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "dispatching task '{}'", self.task)
    }
}

impl StructuredLog for TaskDispatched<'_> {
    fn log(&self) {
        tracing::debug!(task = self.task, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("task_dispatched", span_name = name, task = self.task)
    }
}

pub struct TaskCompleted<'a> {
    pub task: &'a str,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "task '{}' completed", self.task)
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(task = self.task, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("task_completed", span_name = name, task = self.task)
    }
}

pub struct TaskFailed<'a> {
    pub task: &'a str,
    pub reason: &'a str,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "task '{}' failed: {}", self.task, self.reason)
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("task_failed", span_name = name, task = self.task, reason = self.reason)
    }
}

/// `hit = true` bypassed the body entirely.
pub struct CacheLookup<'a> {
    pub task: &'a str,
    pub hit: bool,
}

impl Display for CacheLookup<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.hit {
            write!(f, "cache hit for task '{}'", self.task)
        } else {
            write!(f, "cache miss for task '{}'", self.task)
        }
    }
}

impl StructuredLog for CacheLookup<'_> {
    fn log(&self) {
        tracing::debug!(task = self.task, hit = self.hit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("cache_lookup", span_name = name, task = self.task, hit = self.hit)
    }
}
