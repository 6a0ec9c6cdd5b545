// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The cache provider contract and its two concrete backends.
//!
//! A provider is addressed by (task fingerprint, canonical digest of the
//! task's projected inputs). The coordinator is the only caller — providers
//! need not be safe under concurrent calls from multiple threads, only
//! under the coordinator's single-threaded serialized access pattern.

pub mod memory;
pub mod sqlite;

use crate::errors::CacheError;
use crate::payload::{Fragment, Payload};
use sha2::{Digest, Sha256};

pub use memory::InMemoryCache;
pub use sqlite::SqliteCache;

/// The default location of the persistent cache when a caller doesn't
/// supply one explicitly.
pub const DEFAULT_CACHE_PATH: &str = "cache.db";

/// Addresses a single cache entry: a task's stable identity plus a
/// canonical digest of the inputs it was invoked with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: String,
    pub inputs_digest: Vec<u8>,
}

impl CacheKey {
    /// Build a key from a task's fingerprint and the inputs it was actually
    /// invoked with, hashing the inputs' canonical byte encoding so that
    /// two logically-equal inputs always produce the same key regardless of
    /// how they were constructed.
    pub fn new(fingerprint: impl Into<String>, inputs: &Payload) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(inputs.canonical_bytes());
        Self {
            fingerprint: fingerprint.into(),
            inputs_digest: hasher.finalize().to_vec(),
        }
    }
}

/// A get/set/clear store addressed by [`CacheKey`].
pub trait CacheProvider: Send + Sync {
    /// Returns a previously stored fragment iff an entry exists with an
    /// exactly-equal key.
    fn get(&self, key: &CacheKey) -> Result<Option<Fragment>, CacheError>;

    /// Stores or replaces the entry at `key`.
    fn set(&self, key: &CacheKey, fragment: Fragment) -> Result<(), CacheError>;

    /// Removes entries except the `retain` most recently inserted/updated;
    /// `retain == 0` clears everything. Negative `retain` is a bad-argument
    /// error.
    fn clear(&self, retain: i64) -> Result<(), CacheError>;

    /// Smoke test: set two entries, confirm a lookup returns an equal
    /// value, clear, confirm the lookup now returns absent. Optional —
    /// callers that want it run it explicitly at `Pool` construction.
    fn self_check(&self) -> Result<bool, CacheError> {
        let key_a = CacheKey {
            fingerprint: "__self_check_a__".to_string(),
            inputs_digest: vec![1],
        };
        let key_b = CacheKey {
            fingerprint: "__self_check_b__".to_string(),
            inputs_digest: vec![2],
        };
        let fragment = Fragment::from([("c".to_string(), serde_json::json!(3))]);

        self.set(&key_a, fragment.clone())?;
        self.set(&key_b, fragment.clone())?;
        if self.get(&key_a)? != Some(fragment) {
            return Ok(false);
        }

        self.clear(0)?;
        Ok(self.get(&key_a)?.is_none())
    }
}
