//! Normalises administrative call failures into operator-facing kinds.

use pulsarctl_admin::AdminError;
use thiserror::Error;

/// Failure of a remote administrative call, tagged by category.
///
/// The message is the one produced by the server or transport, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// The server rejected the request as malformed.
    #[error("{message}")]
    Argument {
        /// Original message.
        message: String,
    },
    /// The addressed resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Original message.
        message: String,
    },
    /// The caller lacks the required permission.
    #[error("{message}")]
    Permission {
        /// Original message.
        message: String,
    },
    /// The request conflicts with the resource's current state.
    #[error("{message}")]
    Conflict {
        /// Original message.
        message: String,
    },
    /// No response was obtained.
    #[error("{message}")]
    Transport {
        /// Original message.
        message: String,
    },
    /// Anything not covered above.
    #[error("{message}")]
    Unknown {
        /// Original message.
        message: String,
    },
}

impl ClassifiedError {
    /// Short category label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Argument { .. } => "argument",
            Self::NotFound { .. } => "not_found",
            Self::Permission { .. } => "permission",
            Self::Conflict { .. } => "conflict",
            Self::Transport { .. } => "transport",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Whether the failure was caused by the request the operator typed.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::Argument { .. } | Self::Conflict { .. })
    }
}

/// Classify an administrative call failure.
#[must_use]
pub fn classify(error: &AdminError) -> ClassifiedError {
    let message = error.to_string();
    if let Some(code) = error.status_code() {
        return match code {
            400 | 412 | 422 => ClassifiedError::Argument { message },
            401 | 403 => ClassifiedError::Permission { message },
            404 => ClassifiedError::NotFound { message },
            409 => ClassifiedError::Conflict { message },
            _ => ClassifiedError::Unknown { message },
        };
    }
    match error {
        AdminError::Transport { .. } | AdminError::InvalidUrl { .. } => {
            ClassifiedError::Transport { message }
        }
        AdminError::Status { .. } | AdminError::Decode { .. } => {
            ClassifiedError::Unknown { message }
        }
    }
}
