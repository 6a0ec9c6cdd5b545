// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod cache;
mod execution;
mod run;

pub use cache::CacheError;
pub use execution::ExecutionError;
pub use run::RunError;

/// The single error type returned from [`crate::pool::Pool::run`], wrapping the
/// three error taxonomies a run can fail with: scheduling failures, task-body
/// execution failures, and cache-backend failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
