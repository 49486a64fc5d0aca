//! Per-command span construction.
//!
//! # Design
//! - One span wraps each command invocation and carries the trace identifier,
//!   the command label and the build SHA, so every event logged while the
//!   command runs is tagged with them.

use tracing::Span;

use crate::init::build_sha;

/// Build the span that wraps one command invocation.
#[must_use]
pub fn command_span(trace_id: &str, command: &str) -> Span {
    tracing::info_span!(
        "command",
        trace_id = %trace_id,
        command = %command,
        build_sha = %build_sha()
    )
}
