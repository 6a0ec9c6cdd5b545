// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types implementing `Display` (human-readable) and
//! [`StructuredLog`] (machine-readable fields + span) so call sites never
//! scatter ad hoc format strings.

pub mod engine;

use tracing::Span;

pub trait StructuredLog {
    /// Emit this message through `tracing` at its appropriate level, with
    /// structured fields alongside the human-readable text.
    fn log(&self);

    /// Build a span carrying this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}
