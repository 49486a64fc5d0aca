//! Shared client wiring, error types, and telemetry helpers for the CLI.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pulsarctl_admin::{AdminError, HttpAdmin, HttpAdminConfig, PulsarAdmin};
use reqwest::{Client, Url};
use serde::Serialize;
use thiserror::Error;

use crate::args::ArgumentError;
use crate::classify::{ClassifiedError, classify};
use crate::cli::GlobalArgs;
use crate::registry::RegistryError;

/// Environment variable naming the optional outcome telemetry endpoint.
pub const TELEMETRY_ENDPOINT_ENV: &str = "PULSARCTL_TELEMETRY_ENDPOINT";

/// Exit code for invocations rejected before or by validation.
pub const EXIT_VALIDATION: i32 = 2;
/// Exit code for operational failures.
pub const EXIT_FAILURE: i32 = 3;

/// CLI-level error type; each variant names the layer that failed.
#[derive(Debug, Error)]
pub enum CliError {
    /// Wrong number of positional names.
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
    /// A name or flag was present but its value is not acceptable.
    #[error("{0}")]
    InvalidValue(String),
    /// The administrative call failed.
    #[error(transparent)]
    Remote(#[from] ClassifiedError),
    /// No command is registered under the requested name.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The command line could not be parsed.
    #[error(transparent)]
    Usage(#[from] clap::Error),
    /// A local operation failed.
    #[error("{0:#}")]
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Build a domain parsing error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Build an operational failure.
    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Process exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(err) if !err.use_stderr() => 0,
            Self::Arguments(_) | Self::InvalidValue(_) | Self::Registry(_) | Self::Usage(_) => {
                EXIT_VALIDATION
            }
            Self::Remote(err) if err.is_caller_error() => EXIT_VALIDATION,
            Self::Remote(_) | Self::Failure(_) => EXIT_FAILURE,
        }
    }

    /// Whether the error is help or version text requested by the operator.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::Usage(err) if !err.use_stderr())
    }

    /// Message shown to the operator.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Usage(err) => err.to_string().trim_end().to_string(),
            other => other.to_string(),
        }
    }

    /// Outcome label used in telemetry and logs.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Arguments(_) => "argument_error",
            Self::InvalidValue(_) => "invalid_value",
            Self::Remote(err) => err.kind(),
            Self::Registry(_) => "unknown_command",
            Self::Usage(_) => "usage_error",
            Self::Failure(_) => "failure",
        }
    }
}

impl From<AdminError> for CliError {
    fn from(err: AdminError) -> Self {
        Self::Remote(classify(&err))
    }
}

/// Dependencies constructed from global flags and the environment.
#[derive(Clone)]
pub struct CliDependencies {
    /// Administrative client used by every verb.
    pub admin: Arc<dyn PulsarAdmin>,
    /// Optional outcome telemetry sink.
    pub telemetry: Option<TelemetryEmitter>,
}

impl CliDependencies {
    /// Construct the HTTP administrative client and optional telemetry emitter.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Failure`] when the HTTP client cannot be built.
    pub fn from_env(globals: &GlobalArgs, trace_id: &str) -> CliResult<Self> {
        let admin = HttpAdmin::new(HttpAdminConfig {
            web_service_url: globals.web_service_url.clone(),
            bookie_service_url: globals.bookie_service_url.clone(),
            timeout: Duration::from_secs(globals.timeout),
            request_id: Some(trace_id.to_string()),
        })
        .map_err(CliError::failure)?;

        Ok(Self {
            admin: Arc::new(admin),
            telemetry: TelemetryEmitter::from_env(),
        })
    }
}

/// Telemetry emitter used to forward CLI outcomes.
#[derive(Clone)]
pub struct TelemetryEmitter {
    pub(crate) client: Client,
    pub(crate) endpoint: Url,
}

impl TelemetryEmitter {
    /// Build an emitter when `PULSARCTL_TELEMETRY_ENDPOINT` is set to a valid URL.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(TELEMETRY_ENDPOINT_ENV).ok()?;
        let endpoint = endpoint.parse().ok()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .ok()?;
        Some(Self { client, endpoint })
    }

    /// Post one outcome event; delivery failures are only logged.
    pub async fn emit(
        &self,
        trace_id: &str,
        command: &str,
        outcome: &str,
        exit_code: i32,
        message: Option<&str>,
    ) {
        let event = TelemetryEvent {
            command,
            outcome,
            trace_id,
            exit_code,
            message,
            timestamp_ms: timestamp_now_ms(),
        };

        if let Err(err) = self
            .client
            .post(self.endpoint.clone())
            .json(&event)
            .send()
            .await
        {
            tracing::debug!(error = %err, "telemetry emit failed");
        }
    }
}

#[derive(Serialize)]
struct TelemetryEvent<'a> {
    command: &'a str,
    outcome: &'a str,
    trace_id: &'a str,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp_ms: u64,
}

/// Parse a service URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Millisecond timestamp helper for telemetry.
#[must_use]
pub(crate) fn timestamp_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
