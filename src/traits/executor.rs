// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::EngineError;
use crate::payload::Payload;
use crate::traits::task::Task;
use async_trait::async_trait;
use std::sync::Arc;

/// A driver that runs a task list to completion against an initially-empty
/// payload. Serial and parallel executors both implement this; `Pool`
/// depends on the trait, not the concrete driver.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, tasks: &[Arc<dyn Task>]) -> Result<Payload, EngineError>;
}
