// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod cache;
pub mod config;
pub mod engine;
pub mod errors;
pub mod observability;
pub mod payload;
pub mod pool;
pub mod traits;

pub use errors::{CacheError, EngineError, ExecutionError, RunError};
pub use payload::{Fragment, Payload};
pub use pool::{ExecutorKind, Pool, PoolBuilder};
pub use traits::task::{ClosureTask, Task, TaskError};
