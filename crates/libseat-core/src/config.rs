// ── Runtime connection configuration ──
//
// These types describe *how* to talk to a libseat backend. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds a `ClientConfig` through `libseat-config` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use libseat_api::models::DEFAULT_PAGE_SIZE;

/// How to authenticate with the backend.
#[derive(Debug, Clone, Default)]
pub enum AuthCredentials {
    /// No session; only public endpoints work.
    #[default]
    Anonymous,
    /// A previously issued bearer token (e.g. loaded from the keyring).
    Token {
        access: SecretString,
        refresh: Option<SecretString>,
    },
    /// Username + password exchanged for tokens at sign-in.
    Password {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root (e.g. `https://library.example.org`).
    pub server: Url,
    /// Versioned API base path appended to `server`.
    pub api_base: String,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Transport-level request timeout.
    pub timeout: Duration,
    /// Page size assumed when computing page counts.
    pub page_size: u32,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            api_base: libseat_api::DEFAULT_API_BASE.into(),
            auth: AuthCredentials::Anonymous,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = auth;
        self
    }

    pub(crate) fn transport(&self) -> libseat_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => libseat_api::TlsMode::System,
            TlsVerification::CustomCa(path) => libseat_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => libseat_api::TlsMode::DangerAcceptInvalid,
        };
        libseat_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
