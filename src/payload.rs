// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The shared data bus that flows through a single run.
//!
//! A [`Payload`] is an append-only, string-keyed map of [`serde_json::Value`]s. Tasks
//! read a projection of it (their declared parameter names) and contribute a
//! [`Fragment`] back; fragments are merged into the run's accumulated payload by the
//! executors, never by tasks themselves.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// A task's output contribution to the payload. Possibly empty.
pub type Fragment = HashMap<String, Value>;

/// The accumulated string-keyed mapping shared across a single run.
#[derive(Debug, Clone, Default)]
pub struct Payload(HashMap<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> HashMap<String, Value> {
        self.0
    }

    /// Build the sub-payload a task actually declared, for dispatch and cache-key
    /// purposes. The caller is responsible for having already verified every name
    /// is present (readiness is checked before this is called).
    pub fn project(&self, names: &[String]) -> Payload {
        let mut projected = HashMap::with_capacity(names.len());
        for name in names {
            if let Some(value) = self.0.get(name) {
                projected.insert(name.clone(), value.clone());
            }
        }
        Payload(projected)
    }

    /// Merge a fragment into this payload. Fails if any key already exists —
    /// the payload is append-only, and a repeated key means two producers
    /// collided on the same output name.
    pub fn merge_fragment(&mut self, fragment: Fragment) -> Result<(), String> {
        for key in fragment.keys() {
            if self.0.contains_key(key) {
                return Err(key.clone());
            }
        }
        self.0.extend(fragment);
        Ok(())
    }

    /// Canonical byte encoding used for cache-key hashing: object keys are sorted
    /// recursively so that two logically-equal payloads always serialize
    /// byte-for-byte identically, regardless of insertion order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut sorted: Vec<(&String, &Value)> = self.0.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let mut canonical = Map::new();
        for (key, value) in sorted {
            canonical.insert(key.clone(), canonicalize(value));
        }
        serde_json::to_vec(&Value::Object(canonical)).expect("canonical JSON encoding")
    }
}

impl From<HashMap<String, Value>> for Payload {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Recursively sort object keys so the encoding of a value is independent of the
/// order its keys were inserted in.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<(&String, &Value)> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, value) in sorted {
                out.insert(key.clone(), canonicalize(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_fragment_rejects_duplicate_key() {
        let mut payload = Payload::new();
        payload
            .merge_fragment(HashMap::from([("a".to_string(), json!(1))]))
            .unwrap();
        let err = payload
            .merge_fragment(HashMap::from([("a".to_string(), json!(2))]))
            .unwrap_err();
        assert_eq!(err, "a");
    }

    #[test]
    fn canonical_bytes_ignore_key_order() {
        let p1 = Payload::from(HashMap::from([
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
        ]));
        let p2 = Payload::from(HashMap::from([
            ("b".to_string(), json!(2)),
            ("a".to_string(), json!(1)),
        ]));
        assert_eq!(p1.canonical_bytes(), p2.canonical_bytes());
    }

    #[test]
    fn canonical_bytes_differ_on_value_change() {
        let p1 = Payload::from(HashMap::from([("a".to_string(), json!(1))]));
        let p2 = Payload::from(HashMap::from([("a".to_string(), json!(2))]));
        assert_ne!(p1.canonical_bytes(), p2.canonical_bytes());
    }

    #[test]
    fn project_only_includes_requested_keys() {
        let payload = Payload::from(HashMap::from([
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
        ]));
        let projected = payload.project(&["a".to_string()]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("a"), Some(&json!(1)));
        assert_eq!(projected.get("b"), None);
    }
}
