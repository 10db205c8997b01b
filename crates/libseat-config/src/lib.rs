//! Shared configuration for libseat tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `libseat_core::ClientConfig`. The CLI layers its global
//! flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use libseat_core::{AuthCredentials, ClientConfig, TlsVerification};

/// Service name under which tokens are stored in the system keyring.
pub const KEYRING_SERVICE: &str = "libseat";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "LIBSEAT_";

const MAX_PAGE_SIZE: u32 = 100;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the default.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    20
}
fn default_api_base() -> String {
    "/api/v1/".into()
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Server root URL (e.g. "https://library.example.org").
    pub server: String,

    /// Versioned API path under the server root.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Username last used to sign in with this profile.
    pub username: Option<String>,

    /// Access token (plaintext; prefer the keyring or `token_env`).
    pub token: Option<String>,

    /// Environment variable holding an access token.
    pub token_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default TLS verification setting.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the default page size.
    pub page_size: Option<u32>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            api_base: default_api_base(),
            username: None,
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            page_size: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "libseat", "libseat").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("libseat");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file. A missing file yields the defaults.
///
/// Nested keys can be overridden from the environment with a double
/// underscore, e.g. `LIBSEAT_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to the defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, kind: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{kind}"),
    )?)
}

/// Persist the tokens issued at login.
pub fn store_tokens(
    profile_name: &str,
    access: &SecretString,
    refresh: Option<&SecretString>,
) -> Result<(), ConfigError> {
    use secrecy::ExposeSecret;

    keyring_entry(profile_name, "token")?.set_password(access.expose_secret())?;
    if let Some(refresh) = refresh {
        keyring_entry(profile_name, "refresh")?.set_password(refresh.expose_secret())?;
    }
    Ok(())
}

/// Remove stored tokens. Missing entries are not an error.
pub fn clear_tokens(profile_name: &str) -> Result<(), ConfigError> {
    for kind in ["token", "refresh"] {
        match keyring_entry(profile_name, kind)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    keyring_entry(profile_name, kind)
        .ok()?
        .get_password()
        .ok()
        .map(SecretString::from)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an access token from the credential chain:
/// `token_env` → keyring → plaintext in the profile.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_from(
        profile,
        |name| std::env::var(name).ok(),
        || keyring_secret(profile_name, "token"),
    )
}

fn resolve_token_from(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce() -> Option<SecretString>,
) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(value) = profile.token_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }

    // 2. System keyring
    if let Some(secret) = keyring() {
        return Some(secret);
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Resolve `AuthCredentials` for a profile: a stored token if there is
/// one, otherwise an anonymous session.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> AuthCredentials {
    match resolve_token(profile, profile_name) {
        Some(access) => AuthCredentials::Token {
            access,
            refresh: keyring_secret(profile_name, "refresh"),
        },
        None => AuthCredentials::Anonymous,
    }
}

// ── Translation to ClientConfig ─────────────────────────────────────

pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http or https URL, got '{raw}'"),
        });
    }
    Ok(url)
}

pub fn validate_page_size(page_size: u32) -> Result<u32, ConfigError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }
    Ok(page_size)
}

/// Build a `ClientConfig` from a profile with no CLI overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let mut config = profile_settings(profile, defaults)?;
    config.auth = resolve_auth(profile, profile_name);
    Ok(config)
}

/// Connection settings of a profile, without credentials.
pub fn profile_settings(profile: &Profile, defaults: &Defaults) -> Result<ClientConfig, ConfigError> {
    let server = parse_server_url(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ClientConfig::new(server);
    config.api_base.clone_from(&profile.api_base);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.page_size = validate_page_size(profile.page_size.unwrap_or(defaults.page_size))?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.page_size, 20);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("https://library.example.org");
        profile.username = Some("ada".into());
        profile.timeout = Some(5);
        cfg.profiles.insert("campus".into(), profile);
        cfg.default_profile = Some("campus".into());

        save_config_to(&path, &cfg).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.profile("campus").unwrap().api_base, "/api/v1/");
    }

    #[test]
    fn profile_file_parses_partial_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "local"

[defaults]
output = "json"

[profiles.local]
server = "http://localhost:8000"
insecure = true
page_size = 50
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let settings = profile_settings(cfg.profile("local").unwrap(), &cfg.defaults).unwrap();
        assert_eq!(settings.server.as_str(), "http://localhost:8000/");
        assert_eq!(settings.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(settings.page_size, 50);
    }

    #[test]
    fn unknown_profile_is_reported() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
        assert_eq!(cfg.active_profile_name(None), "default");
        assert_eq!(cfg.active_profile_name(Some("x")), "x");
    }

    #[test]
    fn server_url_must_be_http() {
        assert!(parse_server_url("ftp://lib.example.org").is_err());
        assert!(parse_server_url("not a url").is_err());
        assert!(parse_server_url("https://lib.example.org").is_ok());
    }

    #[test]
    fn page_size_bounds() {
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
        assert_eq!(validate_page_size(100).unwrap(), 100);
    }

    #[test]
    fn token_chain_prefers_env_then_keyring_then_plaintext() {
        let mut profile = Profile::new("https://lib.example.org");
        profile.token = Some("plain".into());
        profile.token_env = Some("LIBSEAT_TEST_TOKEN".into());

        let from_env = resolve_token_from(
            &profile,
            |name| (name == "LIBSEAT_TEST_TOKEN").then(|| "env".to_owned()),
            || Some(SecretString::from("ring")),
        );
        assert_eq!(from_env.unwrap().expose_secret(), "env");

        let from_ring = resolve_token_from(&profile, |_| None, || Some(SecretString::from("ring")));
        assert_eq!(from_ring.unwrap().expose_secret(), "ring");

        let from_file = resolve_token_from(&profile, |_| None, || None);
        assert_eq!(from_file.unwrap().expose_secret(), "plain");

        profile.token = None;
        assert!(resolve_token_from(&profile, |_| None, || None).is_none());
    }
}
