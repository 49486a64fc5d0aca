//! Error type surfaced by administrative calls.

use thiserror::Error;

/// Convenience alias for administrative call results.
pub type AdminResult<T> = Result<T, AdminError>;

/// Failure returned by a [`crate::PulsarAdmin`] call.
///
/// Every variant keeps the text produced by the server or transport so callers
/// can show it to the operator unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// The server answered with a non-success status.
    #[error("{reason}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Reason reported by the server.
        reason: String,
    },
    /// The request never produced a response (connect, timeout, TLS).
    #[error("{message}")]
    Transport {
        /// Transport error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("{message}")]
    Decode {
        /// Decoder error description.
        message: String,
    },
    /// A request URL could not be built from the configured service URL.
    #[error("{message}")]
    InvalidUrl {
        /// URL error description.
        message: String,
    },
}

impl AdminError {
    /// Build a status error from a response code and server-provided reason.
    pub fn status(code: u16, reason: impl Into<String>) -> Self {
        Self::Status {
            code,
            reason: reason.into(),
        }
    }

    /// Build a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status attached to the failure, when the server answered.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport { .. } | Self::Decode { .. } | Self::InvalidUrl { .. } => None,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16(), err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
