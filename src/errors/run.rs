// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while a run is in flight, once the scheduler discovers that
//! the task list can't actually be carried to completion against the payload
//! it has accumulated so far. There is no separate graph-discovery phase:
//! these surface at the point they become observable during dispatch.

/// Errors a serial or parallel run can fail with while scheduling tasks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    /// A task declares a parameter that never appeared as a key in the
    /// payload — serial runs detect this the moment they reach the task;
    /// parallel runs detect it when the dispatch loop stalls with
    /// unsatisfied tasks still waiting.
    #[error("task '{task}' declares parameter '{parameter}' but no task produced it")]
    MissingProducer { task: String, parameter: String },

    /// Two tasks' output fragments collided on the same key when merged
    /// into the run's payload.
    #[error("output key '{key}' was already produced when '{producer}' tried to add it")]
    DuplicateOutput { key: String, producer: String },

    /// Two tasks in the same registry share a name. Caught before a run
    /// starts, since the engine can check it without executing anything.
    #[error("duplicate task name '{0}' in registry")]
    DuplicateTaskName(String),
}
