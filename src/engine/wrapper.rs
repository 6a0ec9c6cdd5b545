// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wraps a single task invocation with cache-lookup/cache-store logic and
//! output-shape validation. The serial executor drives these primitives
//! back-to-back through [`invoke`]; the parallel executor interleaves the
//! cache lookup with its own ready-scan and defers the body itself to a
//! worker thread, so it calls [`cache_hit`], a bare `Task::execute`, and
//! [`store`] separately instead.

use crate::cache::{CacheKey, CacheProvider};
use crate::errors::{CacheError, ExecutionError};
use crate::payload::{Fragment, Payload};
use crate::traits::Task;
use serde_json::Value;

/// Whether the body actually ran, for callers that need to distinguish a
/// cache hit from a miss (the parallel executor's cascading hit scan).
#[derive(Debug)]
pub enum Outcome {
    CacheHit(Fragment),
    Executed(Fragment),
}

impl Outcome {
    pub fn into_fragment(self) -> Fragment {
        match self {
            Outcome::CacheHit(fragment) | Outcome::Executed(fragment) => fragment,
        }
    }
}

/// Run `task` against `inputs`, consulting `cache` first when the task has
/// caching enabled and a provider is bound. On a cache hit the body is never
/// invoked — any side effects it would have performed are skipped, which is
/// the intended memoization contract.
pub fn invoke(
    task: &dyn Task,
    inputs: &Payload,
    cache: Option<&dyn CacheProvider>,
) -> Result<Outcome, ExecutionError> {
    if let Some(fragment) = cache_hit(task, inputs, cache)? {
        return Ok(Outcome::CacheHit(fragment));
    }
    let output = task
        .execute(inputs)
        .map_err(|source| ExecutionError::WorkerFailure {
            task: task.name().to_string(),
            source,
        })?;
    let fragment = validate_shape(task.name(), output)?;
    store(task, inputs, &fragment, cache)?;
    Ok(Outcome::Executed(fragment))
}

/// Consult the cache without touching the task body. Returns `Ok(None)`
/// both on a genuine miss and when caching is disabled for this task or no
/// provider is bound.
pub fn cache_hit(
    task: &dyn Task,
    inputs: &Payload,
    cache: Option<&dyn CacheProvider>,
) -> Result<Option<Fragment>, ExecutionError> {
    let Some(cache) = cache.filter(|_| task.cache_enabled()) else {
        return Ok(None);
    };
    let key = CacheKey::new(task.fingerprint(), inputs);
    cache.get(&key).map_err(cache_failure(task.name()))
}

/// Store a freshly-computed fragment under the same key a lookup for these
/// inputs would use. A no-op when caching is disabled or unbound.
pub fn store(
    task: &dyn Task,
    inputs: &Payload,
    fragment: &Fragment,
    cache: Option<&dyn CacheProvider>,
) -> Result<(), ExecutionError> {
    let Some(cache) = cache.filter(|_| task.cache_enabled()) else {
        return Ok(());
    };
    let key = CacheKey::new(task.fingerprint(), inputs);
    cache
        .set(&key, fragment.clone())
        .map_err(cache_failure(task.name()))
}

/// An empty or absent body result is a valid, cacheable empty fragment.
/// Anything other than `Value::Object` fails with *invalid-output*.
pub fn validate_shape(task_name: &str, output: Value) -> Result<Fragment, ExecutionError> {
    match output {
        Value::Null => Ok(Fragment::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ExecutionError::InvalidOutput {
            task: task_name.to_string(),
            reason: format!("expected null or an object, got {other}"),
        }),
    }
}

fn cache_failure(task_name: &str) -> impl Fn(CacheError) -> ExecutionError + '_ {
    move |err| ExecutionError::WorkerFailure {
        task: task_name.to_string(),
        source: anyhow::Error::new(err),
    }
}
