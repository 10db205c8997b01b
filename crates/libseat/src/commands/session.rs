//! Session commands: login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;
use tracing::{info, warn};

use libseat_api::models::User;
use libseat_config::Profile;
use libseat_core::{AppContext, AuthCredentials, CoreError};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;

use super::util;

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = libseat_config::load_config()?;
    let mut resolved = config::resolve_with(global, &cfg)?;
    let profile_name = resolved.profile_name.clone();

    // Connect anonymously; the password exchange issues fresh tokens
    resolved.client.auth = AuthCredentials::Anonymous;
    let ctx = AppContext::new(&resolved.client)?;

    let remembered = cfg
        .profiles
        .get(&profile_name)
        .and_then(|p| p.username.clone());
    let username = match args.username.or(remembered) {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match args.password {
        Some(pw) => pw,
        None => rpassword::prompt_password("Password: ")?,
    };
    if username.trim().is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }
    let password = SecretString::from(password);

    let resp = util::spin("Signing in", global, ctx.client().login(&username, &password))
        .await
        .map_err(CoreError::from)?;
    ctx.session().sign_in(resp.user.clone(), resp.refresh.clone());
    info!(user = %resp.user.username, profile = %profile_name, "signed in");

    if !args.no_store {
        match libseat_config::store_tokens(&profile_name, &resp.access, resp.refresh.as_ref()) {
            Ok(()) => {
                let server = resolved.client.server.to_string();
                let profile = cfg
                    .profiles
                    .entry(profile_name.clone())
                    .or_insert_with(|| Profile::new(server));
                profile.username = Some(username);
                if cfg.default_profile.is_none() {
                    cfg.default_profile = Some(profile_name.clone());
                }
                config::save_config(&cfg)?;
            }
            Err(e) => {
                warn!(error = %e, "could not store tokens");
                util::note(
                    global,
                    &format!(
                        "Signed in, but the keyring is unavailable ({e}).\n\
                         Set LIBSEAT_TOKEN to reuse a session."
                    ),
                );
            }
        }
    }

    util::note(
        global,
        &format!(
            "Signed in as {} ({}) on profile '{profile_name}'",
            resp.user.display_name(),
            role_label(&resp.user)
        ),
    );
    Ok(())
}

/// Ends the session server-side when possible and always forgets the
/// stored tokens.
pub async fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let ctx = AppContext::new(&resolved.client)?;

    if let AuthCredentials::Token { access, refresh } = &resolved.client.auth {
        ctx.client().set_token(access.clone());
        if let Err(e) = util::spin("Signing out", global, ctx.client().logout(refresh.as_ref())).await
        {
            warn!(error = %e, "server-side logout failed");
        }
    }

    libseat_config::clear_tokens(&resolved.profile_name)?;
    util::note(
        global,
        &format!("Signed out of profile '{}'", resolved.profile_name),
    );
    Ok(())
}

pub async fn whoami(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    let user = match ctx.session().user() {
        Some(user) => user,
        None => util::spin("Loading profile", global, ctx.refresh_profile()).await?,
    };
    util::print_detail(&user, global, user_detail, |u| u.username.clone());
    Ok(())
}

fn role_label(user: &User) -> String {
    user.role_display
        .clone()
        .unwrap_or_else(|| user.role.to_string())
}

pub fn user_detail(u: &User) -> String {
    [
        format!("ID:       {}", u.id),
        format!("Username: {}", u.username),
        format!("Name:     {}", u.display_name()),
        format!("Email:    {}", util::or_dash(u.email.as_deref())),
        format!("Role:     {}", role_label(u)),
        format!("Approved: {}", if u.is_approved { "yes" } else { "no" }),
        format!(
            "Joined:   {}",
            u.date_joined
                .map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d").to_string())
        ),
    ]
    .join("\n")
}
