// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod task;

pub use executor::Executor;
pub use task::{ClosureTask, Task, TaskError};
