//! HTTP client for the authentication service.
//!
//! Two endpoints are consumed, both relative to a configured base URL:
//!
//! | Call | Request | Success |
//! |------|---------|---------|
//! | [`AuthClient::login`] | `POST /login` with `{email, password}` | body carries `token` |
//! | [`AuthClient::fetch_user`] | `GET /user` with `Authorization: Bearer` | profile with `name` |
//!
//! # Error Mapping
//!
//! Every failure is classified into [`AuthError`] at this boundary so callers never
//! see `reqwest` types:
//!
//! - Connection errors and timeouts are `Transport`, as is a 5xx from `/login`
//! - `/login` answering anything else without a token is `InvalidCredentials`
//! - `/user` answering any non-2xx status, or a body that is not a profile,
//!   is `Unauthorized`

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub use latchkey_types::{AuthError, BearerToken, Credentials, UserProfile};

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const LOGIN_PATH: &str = "login";
const USER_PATH: &str = "user";

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("base URL must use http or https, got `{0}`")]
    UnsupportedScheme(String),
    #[error("base URL `{0}` cannot be used as a base")]
    CannotBeABase(Url),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

fn base_client_builder(options: &ClientOptions) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("latchkey/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Client bound to one authentication service.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(base_url: Url, options: &ClientOptions) -> Result<Self, ClientBuildError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientBuildError::UnsupportedScheme(
                base_url.scheme().to_string(),
            ));
        }
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::CannotBeABase(base_url));
        }
        let http = base_client_builder(options).build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::Transport(format!("invalid endpoint `{path}`: {e}")))
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<BearerToken, AuthError> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response = self
            .http
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AuthError::Transport(format!("login failed with {status}")));
        }
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            debug!(%status, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        extract_token(&body).ok_or(AuthError::InvalidCredentials)
    }

    /// Resolve a token into the profile it belongs to.
    pub async fn fetch_user(&self, token: &BearerToken) -> Result<UserProfile, AuthError> {
        let url = self.endpoint(USER_PATH)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "User lookup rejected token");
            return Err(AuthError::Unauthorized);
        }
        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice::<UserProfile>(&body).map_err(|e| {
            debug!("User lookup returned an unusable profile: {e}");
            AuthError::Unauthorized
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn extract_token(body: &[u8]) -> Option<BearerToken> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    let raw = payload.get("token")?.as_str()?;
    BearerToken::new(raw).ok()
}

fn transport_error(err: reqwest::Error) -> AuthError {
    let err = err.without_url();
    if err.is_timeout() {
        AuthError::Transport("request timed out".to_string())
    } else if err.is_connect() {
        AuthError::Transport(format!("connection failed: {err}"))
    } else {
        AuthError::Transport(err.to_string())
    }
}
