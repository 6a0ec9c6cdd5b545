// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! An in-memory cache provider, bounded only by process memory.

use crate::cache::{CacheKey, CacheProvider};
use crate::errors::CacheError;
use crate::payload::Fragment;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    /// Insertion order, oldest first. Re-inserting an existing key moves it
    /// to the back so `clear(N>0)` keeps the N most-recently-touched
    /// entries, not the N oldest.
    order: Vec<CacheKey>,
    entries: HashMap<CacheKey, Fragment>,
}

/// Lives for the duration of the owning process; entries do not survive a
/// restart.
#[derive(Default)]
pub struct InMemoryCache {
    state: Mutex<State>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheProvider for InMemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Fragment>, CacheError> {
        let state = self.state.lock().expect("cache mutex poisoned");
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &CacheKey, fragment: Fragment) -> Result<(), CacheError> {
        let mut state = self.state.lock().expect("cache mutex poisoned");
        let replaced = state.entries.insert(key.clone(), fragment).is_some();
        if replaced {
            state.order.retain(|existing| existing != key);
        }
        state.order.push(key.clone());
        Ok(())
    }

    fn clear(&self, retain: i64) -> Result<(), CacheError> {
        if retain < 0 {
            return Err(CacheError::BadArgument(format!(
                "retain must be >= 0, got {retain}"
            )));
        }
        let mut state = self.state.lock().expect("cache mutex poisoned");
        let retain = retain as usize;
        if retain == 0 {
            state.order.clear();
            state.entries.clear();
            return Ok(());
        }
        if state.order.len() > retain {
            let drop_count = state.order.len() - retain;
            for key in state.order.drain(0..drop_count).collect::<Vec<_>>() {
                state.entries.remove(&key);
            }
        }
        Ok(())
    }
}
