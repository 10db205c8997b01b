// Session endpoints: login, token refresh, logout, current user, register.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginResponse, RefreshResponse, RegisterRequest, User};

impl ApiClient {
    /// Authenticate with username and password.
    ///
    /// On success the returned access token is installed on this client,
    /// so later calls are authenticated. The caller decides whether to
    /// persist the tokens.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            username: &'a str,
            password: &'a str,
        }

        let resp: LoginResponse = self
            .post(
                "auth/login/",
                &Body {
                    username,
                    password: password.expose_secret(),
                },
            )
            .await?;

        self.set_token(resp.access.clone());
        info!(user = %resp.user.username, "login successful");
        Ok(resp)
    }

    /// Exchange a refresh token for a new access token and install it.
    pub async fn refresh_token(&self, refresh: &SecretString) -> Result<SecretString, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            refresh: &'a str,
        }

        let resp: RefreshResponse = self
            .post(
                "auth/token/refresh/",
                &Body {
                    refresh: refresh.expose_secret(),
                },
            )
            .await?;

        self.set_token(resp.access.clone());
        debug!("access token refreshed");
        Ok(resp.access)
    }

    /// Invalidate the session server-side and drop the local token.
    ///
    /// The local token is cleared even when the server call fails.
    pub async fn logout(&self, refresh: Option<&SecretString>) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            refresh: Option<&'a str>,
        }

        let result = self
            .post_no_response(
                "auth/logout/",
                &Body {
                    refresh: refresh.map(|r| r.expose_secret()),
                },
            )
            .await;
        self.clear_token();
        result
    }

    pub async fn current_user(&self) -> Result<User, Error> {
        self.get("auth/me/").await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<User, Error> {
        self.post("auth/register/", req).await
    }
}
