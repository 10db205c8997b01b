// ── Application context ──
//
// The explicit dependency every view and workflow receives: one API
// client, the session store, and the UI store. Cloning is cheap; all
// clones share the same state.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, warn};

use libseat_api::{ApiClient, PageParams};
use libseat_api::models::{DEFAULT_PAGE_SIZE, User};

use crate::config::{AuthCredentials, ClientConfig};
use crate::error::CoreError;
use crate::session::SessionStore;
use crate::ui::UiStore;

#[derive(Clone)]
pub struct AppContext {
    inner: Arc<Inner>,
}

struct Inner {
    client: ApiClient,
    session: SessionStore,
    ui: UiStore,
    page_size: u32,
}

impl AppContext {
    /// Build a context from configuration. No network traffic happens
    /// until [`sign_in`](Self::sign_in) or a view loads.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(&config.server, &config.api_base, &config.transport())?;
        Ok(Self::from_client(client, config.page_size))
    }

    /// Wrap an existing client (tests point this at a mock server).
    pub fn from_client(client: ApiClient, page_size: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                session: SessionStore::new(),
                ui: UiStore::new(),
                page_size: if page_size == 0 {
                    DEFAULT_PAGE_SIZE
                } else {
                    page_size
                },
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn ui(&self) -> &UiStore {
        &self.inner.ui
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// `page` with the profile's page size filled in when none was asked for.
    pub fn paged(&self, page: PageParams) -> PageParams {
        PageParams {
            page_size: page.page_size.or(Some(self.inner.page_size)),
            ..page
        }
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Establish a session from configured credentials.
    ///
    /// Returns `None` for anonymous configurations.
    pub async fn sign_in(&self, auth: &AuthCredentials) -> Result<Option<User>, CoreError> {
        match auth {
            AuthCredentials::Anonymous => {
                debug!("anonymous session");
                Ok(None)
            }
            AuthCredentials::Token { access, refresh } => {
                self.client().set_token(access.clone());
                let user = match self.client().current_user().await {
                    Ok(user) => user,
                    Err(e) => {
                        self.client().clear_token();
                        return Err(e.into());
                    }
                };
                info!(user = %user.username, "resumed session from stored token");
                self.session().sign_in(user.clone(), refresh.clone());
                Ok(Some(user))
            }
            AuthCredentials::Password { username, password } => {
                self.login(username, password).await.map(Some)
            }
        }
    }

    /// Exchange credentials for tokens and publish the new session.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User, CoreError> {
        let resp = self.client().login(username, password).await?;
        self.session().sign_in(resp.user.clone(), resp.refresh);
        Ok(resp.user)
    }

    /// Re-fetch the profile of the signed-in user.
    pub async fn refresh_profile(&self) -> Result<User, CoreError> {
        if !self.client().has_token() {
            return Err(CoreError::NotSignedIn);
        }
        let user = self.client().current_user().await?;
        self.session().update_user(user.clone());
        Ok(user)
    }

    /// Ends the session locally even if the server call fails.
    pub async fn logout(&self) {
        let refresh = self.session().snapshot().refresh.clone();
        if let Err(e) = self.client().logout(refresh.as_ref()).await {
            warn!(error = %e, "server-side logout failed");
        }
        self.session().clear();
    }

    /// Require a signed-in session before a protected call.
    pub(crate) fn require_session(&self) -> Result<(), CoreError> {
        if self.client().has_token() {
            Ok(())
        } else {
            Err(CoreError::NotSignedIn)
        }
    }

    /// Log and toast a failed mutation, then hand the error back.
    pub(crate) fn report(&self, action: &str, err: CoreError) -> CoreError {
        warn!(action, error = %err, "request failed");
        self.ui().error(err.user_message());
        err
    }
}
