// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The configuration surface: the one check a pool can make on its task
//! list without running anything. There is no precomputed dependency
//! graph here — a task's parameter names are only ever checked against
//! the live payload, during a run, by the executors in [`crate::engine`].

use crate::errors::RunError;
use crate::traits::Task;
use std::collections::HashSet;
use std::sync::Arc;

/// The only check that can be made without running anything: no two tasks
/// share a name. Producer-existence and producer-uniqueness (spec.md §3)
/// depend on what actually lands in the payload, so they are checked by
/// the executors while a run is in flight rather than here.
pub fn validate_task_list(tasks: &[Arc<dyn Task>]) -> Result<(), RunError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.name()) {
            return Err(RunError::DuplicateTaskName(task.name().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;
    use crate::traits::ClosureTask;

    fn task(name: &str) -> Arc<dyn Task> {
        Arc::new(ClosureTask::new(name, vec![], |_: &Payload| {
            Ok(serde_json::Value::Object(serde_json::Map::new()))
        }))
    }

    #[test]
    fn accepts_unique_names() {
        let tasks = vec![task("a"), task("b")];
        assert!(validate_task_list(&tasks).is_ok());
    }

    #[test]
    fn rejects_duplicate_names() {
        let tasks = vec![task("a"), task("a")];
        let err = validate_task_list(&tasks).unwrap_err();
        assert!(matches!(err, RunError::DuplicateTaskName(name) if name == "a"));
    }
}
