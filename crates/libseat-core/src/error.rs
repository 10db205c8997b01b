// ── Core error types ──
//
// User-facing errors from libseat-core. Views turn these into toasts and
// inline error states through `user_message()`. The
// `From<libseat_api::Error>` impl folds every transport-layer failure into
// one of a handful of variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not signed in")]
    NotSignedIn,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Workflow errors ──────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Cannot {action} while {step}")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },

    #[error("Unknown {kind}: {id}")]
    UnknownResource { kind: &'static str, id: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Text suitable for a toast or inline alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. }
            | Self::AuthenticationFailed { message }
            | Self::Validation { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::AuthenticationFailed { .. } | Self::NotSignedIn => Some(401),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<libseat_api::Error> for CoreError {
    fn from(err: libseat_api::Error) -> Self {
        match err {
            libseat_api::Error::Unauthorized { message } => Self::AuthenticationFailed { message },
            libseat_api::Error::Api { status, message } => Self::Api {
                message,
                status: Some(status),
            },
            libseat_api::Error::Transport(ref e) if e.is_timeout() => Self::Timeout,
            libseat_api::Error::Transport(ref e) if e.is_connect() => Self::ConnectionFailed {
                reason: e.to_string(),
            },
            libseat_api::Error::Transport(e) => Self::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            libseat_api::Error::InvalidQuery { field, reason } => Self::Validation {
                message: format!("{field}: {reason}"),
            },
            libseat_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            libseat_api::Error::Tls(msg) => Self::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            libseat_api::Error::Deserialization { message, body: _ } => {
                Self::Internal(format!("Unexpected response from server: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_server_message() {
        let err = CoreError::from(libseat_api::Error::Api {
            status: 409,
            message: "Seat already booked".into(),
        });
        assert_eq!(err.user_message(), "Seat already booked");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn unauthorized_becomes_auth_failure() {
        let err = CoreError::from(libseat_api::Error::Unauthorized {
            message: "Token is invalid or expired".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn query_validation_maps_to_validation() {
        let err = CoreError::from(libseat_api::Error::InvalidQuery {
            field: "page",
            reason: "must be at least 1".into(),
        });
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "page: must be at least 1");
    }

    #[test]
    fn transition_message_reads_naturally() {
        let err = CoreError::InvalidTransition {
            step: "submitting",
            action: "change the seat",
        };
        assert_eq!(err.to_string(), "Cannot change the seat while submitting");
    }
}
