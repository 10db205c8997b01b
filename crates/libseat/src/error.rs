//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use libseat_config::ConfigError;
use libseat_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const VALIDATION: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the server")]
    #[diagnostic(
        code(libseat::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             For self-signed certificates try: libseat --insecure ..."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(libseat::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(libseat::auth_failed),
        help(
            "Your session may have expired.\n\
             Run: libseat login --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("Not signed in")]
    #[diagnostic(
        code(libseat::not_signed_in),
        help(
            "Sign in with: libseat login\n\
             Or set the LIBSEAT_TOKEN environment variable."
        )
    )]
    NotSignedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(libseat::not_found),
        help("Run: libseat {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(libseat::missing))]
    Missing { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(libseat::permission_denied),
        help("This command needs an account with a higher role.")
    )]
    PermissionDenied { message: String },

    #[error("{message}")]
    #[diagnostic(code(libseat::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(libseat::rejected))]
    Rejected { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(libseat::api_error))]
    ApiError { status: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(libseat::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(libseat::invalid_step))]
    InvalidStep { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(libseat::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: libseat config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(libseat::no_config),
        help(
            "Create a profile with: libseat config init\n\
             Or pass --server / set LIBSEAT_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(libseat::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(libseat::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(libseat::prompt))]
    Prompt(String),

    // ── IO / Serialization ──────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(libseat::json))]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::NotFound { .. } | Self::Missing { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::Rejected { .. } | Self::InvalidStep { .. } => {
                exit_code::VALIDATION
            }
            Self::NonInteractiveRequiresYes { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication errors.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed { reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                message,
                profile: "default".into(),
            },
            CoreError::NotSignedIn => Self::NotSignedIn,

            CoreError::Api { message, status } => match status {
                Some(400 | 422) => Self::Rejected { message },
                Some(403) => Self::PermissionDenied { message },
                Some(404) => Self::Missing { message },
                Some(409) => Self::Conflict { message },
                Some(code) => Self::ApiError {
                    status: code.to_string(),
                    message,
                },
                None => Self::ApiError {
                    status: "transport".into(),
                    message,
                },
            },

            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            err @ CoreError::InvalidTransition { .. } => Self::InvalidStep {
                message: err.to_string(),
            },
            CoreError::UnknownResource { kind, id } => Self::NotFound {
                list_command: list_command_for(kind).into(),
                resource_type: kind.into(),
                identifier: id,
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::ApiError {
                status: "internal".into(),
                message,
            },
        }
    }
}

fn list_command_for(kind: &str) -> &'static str {
    match kind {
        "floor" => "libraries floors <LIBRARY>",
        "section" => "libraries sections <FLOOR>",
        "seat" => "libraries seats <SECTION>",
        "event" => "events list",
        "booking" => "bookings list",
        _ => "libraries list",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_statuses_map_to_distinct_exit_codes() {
        let code = |status| {
            CliError::from(CoreError::Api {
                message: "nope".into(),
                status: Some(status),
            })
            .exit_code()
        };
        assert_eq!(code(400), exit_code::VALIDATION);
        assert_eq!(code(403), exit_code::PERMISSION);
        assert_eq!(code(404), exit_code::NOT_FOUND);
        assert_eq!(code(409), exit_code::CONFLICT);
        assert_eq!(code(500), exit_code::GENERAL);
    }

    #[test]
    fn workflow_errors_are_validation_failures() {
        let err = CliError::from(CoreError::InvalidTransition {
            step: "submitting",
            action: "go back",
        });
        assert_eq!(err.exit_code(), exit_code::VALIDATION);
        assert_eq!(err.to_string(), "Cannot go back while submitting");
    }

    #[test]
    fn auth_errors_carry_the_profile() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "Token expired".into(),
        })
        .with_profile("campus");
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "campus"));
    }

    #[test]
    fn unknown_seat_points_at_the_seat_listing() {
        let err = CliError::from(CoreError::UnknownResource {
            kind: "seat",
            id: "42".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "seat '42' not found");
    }
}
