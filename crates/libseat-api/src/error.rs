use thiserror::Error;

/// Top-level error type for the `libseat-api` crate.
///
/// Every failure carries one human-readable message, available through
/// [`Error::message`]. Callers are not expected to branch on the variant
/// beyond auth expiry; `libseat-core` turns these into toasts and inline
/// error states.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server responses ────────────────────────────────────────────
    /// Non-2xx response from the backend, message normalized from the body.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 401 -- missing, expired, or rejected bearer token.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A typed query failed validation before it was serialized.
    #[error("Invalid query parameter `{field}`: {reason}")]
    InvalidQuery { field: &'static str, reason: String },
}

impl Error {
    /// The single display message for this error.
    ///
    /// For server errors this is the normalized body message without the
    /// status prefix; everything else falls back to the `Display` text.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message } => message.clone(),
            Self::Transport(e) if e.is_timeout() => "The request timed out".into(),
            Self::Transport(e) if e.is_connect() => "Could not reach the server".into(),
            other => other.to_string(),
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the session token is missing or no longer valid.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_message_drops_status_prefix() {
        let err = Error::Api {
            status: 400,
            message: "Seat already booked".into(),
        };
        assert_eq!(err.message(), "Seat already booked");
        assert_eq!(err.to_string(), "API error (HTTP 400): Seat already booked");
    }

    #[test]
    fn unauthorized_reports_401() {
        let err = Error::Unauthorized {
            message: "Token expired".into(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_query_message_names_field() {
        let err = Error::InvalidQuery {
            field: "page",
            reason: "must be at least 1".into(),
        };
        assert_eq!(
            err.message(),
            "Invalid query parameter `page`: must be at least 1"
        );
    }
}
