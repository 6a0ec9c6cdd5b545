// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The plug-in point: a unit of work with declared named inputs and a
//! named-output fragment.

use crate::payload::Payload;
use sha2::{Digest, Sha256};
use serde_json::Value;

/// Task bodies are an external collaborator; they may fail for any reason,
/// so their error type is opaque to the engine.
pub type TaskError = anyhow::Error;

/// A computational unit whose data dependencies are expressed implicitly
/// through [`parameter_names`](Task::parameter_names) and the keys its
/// [`execute`](Task::execute) output contributes.
///
/// `execute` is synchronous and CPU-bound by contract; the parallel executor
/// runs it on a blocking thread rather than polling it as a future. It
/// returns a raw [`Value`] rather than an already-validated fragment — shape
/// validation (must be `Value::Null` or `Value::Object`) happens in
/// [`crate::engine::wrapper`], which is also where an *invalid-output* error
/// is raised, so a misbehaving body can't sidestep the check at the type
/// level.
pub trait Task: Send + Sync {
    /// A human-readable identity used in logs and error messages. Need not
    /// be unique, though a run with duplicate names is harder to debug.
    fn name(&self) -> &str;

    /// The ordered input names this task consumes from the payload.
    fn parameter_names(&self) -> &[String];

    /// Run the body against the given inputs (already projected down to
    /// exactly this task's declared parameter names).
    fn execute(&self, inputs: &Payload) -> Result<Value, TaskError>;

    /// Whether the execution wrapper should consult the cache for this
    /// task. Defaults to enabled.
    fn cache_enabled(&self) -> bool {
        true
    }

    /// A stable identifier for this task's body, used as half of the cache
    /// key. The default hashes `std::any::type_name::<Self>()`, which is
    /// stable only within one compilation of one crate version — tasks that
    /// need a cache stable across recompiles should override this with an
    /// explicit version string.
    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(std::any::type_name::<Self>().as_bytes());
        hex_digest(hasher)
    }
}

fn hex_digest(hasher: Sha256) -> String {
    use std::fmt::Write;
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Adapts a plain closure into a [`Task`]. Closures have no source identity
/// the engine can introspect, so a name is required up front and the
/// fingerprint defaults to a hash of that name rather than of the type —
/// two `ClosureTask`s built from identically-shaped closure expressions
/// would otherwise collide on `type_name`.
pub struct ClosureTask<F> {
    name: String,
    parameter_names: Vec<String>,
    cache_enabled: bool,
    fingerprint: Option<String>,
    body: F,
}

impl<F> ClosureTask<F>
where
    F: Fn(&Payload) -> Result<Value, TaskError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, parameter_names: Vec<String>, body: F) -> Self {
        Self {
            name: name.into(),
            parameter_names,
            cache_enabled: true,
            fingerprint: None,
            body,
        }
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Override the default name-derived fingerprint with an explicit
    /// stable identifier, e.g. a version string.
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }
}

impl<F> Task for ClosureTask<F>
where
    F: Fn(&Payload) -> Result<Value, TaskError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    fn execute(&self, inputs: &Payload) -> Result<Value, TaskError> {
        (self.body)(inputs)
    }

    fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    fn fingerprint(&self) -> String {
        match &self.fingerprint {
            Some(explicit) => explicit.clone(),
            None => {
                let mut hasher = Sha256::new();
                hasher.update(self.name.as_bytes());
                hex_digest(hasher)
            }
        }
    }
}
