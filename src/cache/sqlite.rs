// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A single-file table store for the persistent cache, keyed on
//! `(fingerprint, inputs)` with a `UNIQUE` constraint enforcing one row per
//! key.

use crate::cache::{CacheKey, CacheProvider, DEFAULT_CACHE_PATH};
use crate::errors::CacheError;
use crate::payload::Fragment;
use rusqlite::{named_params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS cache (
    fingerprint TEXT NOT NULL,
    inputs BLOB NOT NULL,
    fragment BLOB NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(fingerprint, inputs)
)";

/// Entries survive process restarts until explicitly cleared.
pub struct SqliteCache {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let conn = Self::open_connection(&path)?;
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Open (creating if absent) the cache at the engine's default path,
    /// `cache.db` in the working directory.
    pub fn at_default_path() -> Result<Self, CacheError> {
        Self::open(DEFAULT_CACHE_PATH)
    }

    fn open_connection(path: &Path) -> Result<Connection, CacheError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

impl CacheProvider for SqliteCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Fragment>, CacheError> {
        let conn = self.conn.lock().expect("cache mutex poisoned");
        let mut stmt = conn.prepare_cached(
            "SELECT fragment FROM cache WHERE fingerprint = :fingerprint AND inputs = :inputs",
        )?;
        let mut rows = stmt.query(named_params! {
            ":fingerprint": key.fingerprint,
            ":inputs": key.inputs_digest,
        })?;
        match rows.next()? {
            Some(row) => {
                let bytes: Vec<u8> = row.get(0)?;
                let fragment = serde_json::from_slice(&bytes)
                    .map_err(|err| CacheError::BackendFailure(err.to_string()))?;
                Ok(Some(fragment))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &CacheKey, fragment: Fragment) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(&fragment)
            .map_err(|err| CacheError::BackendFailure(err.to_string()))?;
        let conn = self.conn.lock().expect("cache mutex poisoned");
        conn.execute(
            "INSERT INTO cache (fingerprint, inputs, fragment) \
             VALUES (:fingerprint, :inputs, :fragment) \
             ON CONFLICT(fingerprint, inputs) \
             DO UPDATE SET fragment = excluded.fragment, created_at = CURRENT_TIMESTAMP",
            named_params! {
                ":fingerprint": key.fingerprint,
                ":inputs": key.inputs_digest,
                ":fragment": bytes,
            },
        )?;
        Ok(())
    }

    fn clear(&self, retain: i64) -> Result<(), CacheError> {
        if retain < 0 {
            return Err(CacheError::BadArgument(format!(
                "retain must be >= 0, got {retain}"
            )));
        }
        let mut conn = self.conn.lock().expect("cache mutex poisoned");
        if retain == 0 {
            // spec.md §6: "clear(0) removes the file". The connection
            // held in `conn` keeps the file open for the lifetime of this
            // `SqliteCache`, unlike the original's connection-per-call
            // model, so it has to be swapped out for a throwaway in-memory
            // connection before the file can be unlinked, then replaced
            // with a fresh on-disk connection afterward.
            *conn = Connection::open_in_memory()?;
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|err| CacheError::BackendFailure(err.to_string()))?;
            }
            *conn = Self::open_connection(&self.path)?;
        } else {
            conn.execute(
                "DELETE FROM cache WHERE rowid NOT IN \
                 (SELECT rowid FROM cache ORDER BY created_at DESC LIMIT :retain)",
                named_params! { ":retain": retain },
            )?;
        }
        Ok(())
    }
}
