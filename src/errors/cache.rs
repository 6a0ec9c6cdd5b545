// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by a [`crate::cache::CacheProvider`] implementation.

/// Errors a cache provider can fail with.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The caller passed an invalid argument, e.g. a negative retain count
    /// to `clear`.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// The persistent cache reported an I/O or schema error.
    #[error("cache backend failure: {0}")]
    BackendFailure(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::BackendFailure(err.to_string())
    }
}
