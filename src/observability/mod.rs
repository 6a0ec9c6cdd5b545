// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured log message types for the engine's lifecycle events. No
//! subscriber is installed by this crate — wiring one (stdout, JSON,
//! OpenTelemetry export) is the embedding application's job. Until one is
//! installed, `tracing` events emitted here simply go nowhere.

pub mod messages;
