// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by a task's body, or by the execution wrapper validating
//! what the body handed back.

/// Errors a single task invocation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// A task body returned a value that is neither empty nor a
    /// mapping-with-string-keys.
    #[error("task '{task}' returned an invalid output: {reason}")]
    InvalidOutput { task: String, reason: String },

    /// A worker reported an exception while executing a task body; the
    /// underlying error is surfaced with the task's identity attached.
    #[error("task '{task}' failed")]
    WorkerFailure {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    /// The coordinator hit a state it should be structurally unable to
    /// reach (e.g. a completion handle for a task the coordinator never
    /// dispatched).
    #[error("internal scheduling error: {0}")]
    Internal(String),
}
