//! Output renderer: success payloads to one stream, errors to the other.

use std::io::{self, Write};

use anyhow::anyhow;
use serde_json::Value;

use crate::client::{CliError, CliResult};
use crate::verb::{InvocationResult, Payload};

/// Pretty-print a JSON value with two-space indentation.
pub(crate) fn format_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Writes invocation outcomes to a success and a failure stream.
pub struct Renderer<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Renderer<O, E> {
    /// Wrap the success (`out`) and failure (`err`) streams.
    pub const fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Render `result` and return the process exit code.
    ///
    /// Exactly one of the two streams is written. Success payloads are
    /// formatted in full before anything is written, so a formatting failure
    /// ends up on the failure stream alone.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the selected stream cannot be written.
    pub fn render(&mut self, result: &InvocationResult) -> io::Result<i32> {
        match result {
            Ok(payload) => match render_payload(payload) {
                Ok(text) => {
                    writeln!(self.out, "{text}")?;
                    self.out.flush()?;
                    Ok(0)
                }
                Err(err) => self.render_error(&err),
            },
            Err(err) => self.render_error(err),
        }
    }

    /// Write an error message and return its exit code.
    ///
    /// Help and version text requested by the operator is not an error and
    /// goes to the success stream.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the failure stream cannot be written.
    pub fn render_error(&mut self, error: &CliError) -> io::Result<i32> {
        if error.is_informational() {
            writeln!(self.out, "{}", error.display_message())?;
            self.out.flush()?;
            return Ok(error.exit_code());
        }
        match error {
            CliError::Usage(_) => writeln!(self.err, "{}", error.display_message())?,
            other => writeln!(self.err, "error: {}", other.display_message())?,
        }
        self.err.flush()?;
        Ok(error.exit_code())
    }
}

fn render_payload(payload: &Payload) -> CliResult<String> {
    match payload {
        Payload::Json(value) => format_json(value),
        Payload::Message(message) => Ok(message.clone()),
    }
}
