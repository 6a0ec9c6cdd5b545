// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod parallel;
pub mod serial;
pub mod wrapper;

pub use parallel::ParallelExecutor;
pub use serial::SerialExecutor;
