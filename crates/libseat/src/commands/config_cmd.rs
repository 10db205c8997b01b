//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::Input;

use libseat_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

const KEYS: &str = "server, api_base, username, token, token_env, ca_cert, insecure, timeout, page_size";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be a number, got '{value}'"),
    })
}

/// Apply one `config set` assignment to a profile.
fn apply_setting(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            libseat_config::parse_server_url(&value)?;
            profile.server = value;
        }
        "api_base" | "api-base" => profile.api_base = value,
        "username" => profile.username = Some(value),
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => profile.timeout = Some(parse_number("timeout", &value)?),
        "page_size" | "page-size" => {
            let size = parse_number("page_size", &value)?;
            profile.page_size = Some(libseat_config::validate_page_size(size)?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            if !io::stdin().is_terminal() {
                return Err(CliError::Validation {
                    field: "interactive".into(),
                    reason: "config init needs a terminal; use `libseat config set` instead".into(),
                });
            }
            let path = config::config_path();
            eprintln!("libseat configuration");
            eprintln!("  Config path: {}\n", path.display());

            let mut cfg = libseat_config::load_config()?;

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &cfg))
                .interact_text()?;

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default(global.server.clone().unwrap_or_else(|| "https://library.example.org".into()))
                .validate_with(|raw: &String| {
                    libseat_config::parse_server_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()?;

            let username: String = Input::new()
                .with_prompt("Username (optional)")
                .allow_empty(true)
                .interact_text()?;

            let mut profile = Profile::new(server);
            if !username.trim().is_empty() {
                profile.username = Some(username.trim().to_owned());
            }
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Sign in with: libseat login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = match global.output {
                OutputFormat::Table => toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                    field: "config".into(),
                    reason: format!("failed to render config: {e}"),
                })?,
                format => output::render_single(format, &cfg, |_| String::new(), |c| {
                    c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
                }),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = libseat_config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            if !cfg.profiles.contains_key(&profile_name) {
                if key != "server" {
                    return Err(CliError::Validation {
                        field: key,
                        reason: format!(
                            "profile '{profile_name}' does not exist yet; set its server first"
                        ),
                    });
                }
                libseat_config::parse_server_url(&value)?;
            }
            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(value.clone()));
            apply_setting(profile, &key, value)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: libseat config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.server);
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = libseat_config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://campus.example.org");
        profile.token = Some("secret-access-token".into());
        cfg.profiles.insert("campus".into(), profile);

        let shown = toml::to_string_pretty(&redacted(&cfg)).unwrap();
        assert!(!shown.contains("secret-access-token"));
        assert!(shown.contains(REDACTED));
    }

    #[test]
    fn settings_are_validated() {
        let mut profile = Profile::new("https://campus.example.org");
        apply_setting(&mut profile, "page-size", "50".into()).unwrap();
        assert_eq!(profile.page_size, Some(50));

        assert!(apply_setting(&mut profile, "page_size", "500".into()).is_err());
        assert!(apply_setting(&mut profile, "insecure", "maybe".into()).is_err());
        assert!(apply_setting(&mut profile, "server", "ftp://campus".into()).is_err());
        assert!(matches!(
            apply_setting(&mut profile, "colour", "red".into()),
            Err(CliError::Validation { .. })
        ));
        assert_eq!(profile.server, "https://campus.example.org");
    }
}
