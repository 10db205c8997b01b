// HTTP client for the libseat REST API.
//
// Wraps `reqwest::Client` with versioned-base URL construction, transparent
// bearer-token injection, and error normalization. Endpoint functions are
// implemented as inherent methods in `crate::services::*` so this module
// stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Default versioned base path appended to the server URL.
pub const DEFAULT_API_BASE: &str = "/api/v1/";

/// Async client for the libseat backend.
///
/// Holds the bearer token for the current session; every request made while
/// a token is set carries `Authorization: Bearer <token>`. No retries, no
/// backoff: a failed call surfaces immediately.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `server` (e.g. `https://library.example.org`) with
    /// the given API base path (usually [`DEFAULT_API_BASE`]).
    pub fn new(server: &Url, api_base: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, Self::normalize_base_url(server, api_base)?))
    }

    /// Wrap an existing `reqwest::Client` with an already-resolved base URL.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Join the server root and API base, guaranteeing a trailing slash so
    /// relative endpoint paths resolve underneath it.
    pub fn normalize_base_url(server: &Url, api_base: &str) -> Result<Url, Error> {
        let root = server.as_str().trim_end_matches('/');
        let base = api_base.trim_matches('/');
        let full = if base.is_empty() {
            format!("{root}/")
        } else {
            format!("{root}/{base}/")
        };
        Ok(Url::parse(&full)?)
    }

    /// The resolved base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install the bearer token used for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing access token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the bearer token; subsequent requests are anonymous.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"seats/bookings/"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.apply_auth(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .apply_auth(self.http.get(url).query(params))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// POST an action endpoint that takes no payload (`.../cancel/`, `.../approve/`).
    pub(crate) async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.post(path, &serde_json::json!({})).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .apply_auth(self.http.patch(url).json(body))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.apply_auth(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = normalize_error_message(status, &raw);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::Unauthorized { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Reduce an error body to a single display message.
///
/// Looks at `message`, `detail`, `error`, `non_field_errors[0]`, then the
/// first `field: [msg]` pair of a DRF-style validation body. Falls back to
/// the raw text (if short and not JSON) or the HTTP status reason.
pub(crate) fn normalize_error_message(status: reqwest::StatusCode, raw: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_owned)
    };

    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.len() > 200 {
            return fallback();
        }
        return trimmed.to_owned();
    };

    let Value::Object(map) = value else {
        return first_text(&value).unwrap_or_else(fallback);
    };

    for key in ["message", "detail", "error", "non_field_errors"] {
        if let Some(text) = map.get(key).and_then(first_text) {
            return text;
        }
    }

    map.iter()
        .find_map(|(field, v)| first_text(v).map(|text| format!("{field}: {text}")))
        .unwrap_or_else(fallback)
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
