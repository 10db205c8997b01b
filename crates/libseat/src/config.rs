//! Bridges global CLI flags onto `libseat-config` profiles.
//!
//! Everything file- and keyring-related lives in `libseat_config`; this
//! module only decides which source wins and builds the `ClientConfig`.

use std::time::Duration;

use libseat_config::{Config, Profile};
use libseat_core::{AuthCredentials, ClientConfig, TlsVerification};
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use libseat_config::{config_path, load_config_or_default, save_config};

/// A profile name plus the settings to connect with.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub client: ClientConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Load the config file and resolve connection settings for this run.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = libseat_config::load_config()?;
    resolve_with(global, &cfg)
}

/// Translate the active profile + global flags into a `ClientConfig`.
///
/// Precedence for every setting: flag > env > profile > defaults.
pub fn resolve_with(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = match cfg.profiles.get(&profile_name) {
        Some(profile) => from_profile(profile, &profile_name, global, cfg)?,
        None => from_flags(&profile_name, global, cfg)?,
    };

    // Explicit token beats anything stored
    if let Some(ref token) = global.token {
        client.auth = AuthCredentials::Token {
            access: SecretString::from(token.clone()),
            refresh: None,
        };
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    Ok(Resolved {
        profile_name,
        client,
    })
}

fn from_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ClientConfig, CliError> {
    let mut client = libseat_config::profile_to_client_config(profile, profile_name, &cfg.defaults)?;
    if let Some(ref server) = global.server {
        client.server = libseat_config::parse_server_url(server)?;
    }
    Ok(client)
}

/// No profile on file: build everything from flags and env vars.
fn from_flags(profile_name: &str, global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let Some(ref server) = global.server else {
        // An explicitly named profile that doesn't exist is a typo, not a
        // missing setup.
        if global.profile.is_some() || !cfg.profiles.is_empty() {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: available_profiles(cfg),
            });
        }
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let profile = Profile::new(server.clone());
    Ok(libseat_config::profile_settings(&profile, &cfg.defaults)?)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["libseat"];
        argv.extend_from_slice(args);
        argv.push("whoami");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(name.into(), profile);
        cfg.default_profile = Some(name.into());
        cfg
    }

    #[test]
    fn flags_alone_are_enough_without_a_profile() {
        let resolved = resolve_with(
            &global(&["--server", "https://lib.example.org", "--token", "abc"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(resolved.profile_name, "default");
        assert_eq!(resolved.client.server.as_str(), "https://lib.example.org/");
        match resolved.client.auth {
            AuthCredentials::Token { access, .. } => assert_eq!(access.expose_secret(), "abc"),
            other => panic!("expected token auth, got {other:?}"),
        }
    }

    #[test]
    fn missing_server_without_profiles_is_no_config() {
        let err = resolve_with(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_profile_lists_the_available_ones() {
        let cfg = config_with("campus", Profile::new("https://campus.example.org"));
        let err = resolve_with(&global(&["--profile", "typo"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "typo");
                assert_eq!(available, "campus");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_override_profile_settings() {
        let mut profile = Profile::new("https://campus.example.org");
        profile.timeout = Some(5);
        profile.page_size = Some(50);
        let cfg = config_with("campus", profile);

        let resolved = resolve_with(
            &global(&["--server", "http://localhost:8000", "--timeout", "60", "-k"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(resolved.profile_name, "campus");
        assert_eq!(resolved.client.server.as_str(), "http://localhost:8000/");
        assert_eq!(resolved.client.timeout, Duration::from_secs(60));
        assert_eq!(resolved.client.page_size, 50);
        assert!(matches!(
            resolved.client.tls,
            TlsVerification::DangerAcceptInvalid
        ));
    }

    #[test]
    fn profile_timeout_applies_without_a_flag() {
        let mut profile = Profile::new("https://campus.example.org");
        profile.timeout = Some(5);
        let cfg = config_with("campus", profile);
        let resolved = resolve_with(&global(&[]), &cfg).unwrap();
        assert_eq!(resolved.client.timeout, Duration::from_secs(5));
    }
}
