//! Shared test utilities and fixtures
//!
//! A stub authentication service plus helpers to wire the real services
//! against it.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use latchkey_client::{AuthClient, ClientOptions};
use latchkey_core::{SessionService, ThemeService};
use latchkey_store::CredentialStore;
use latchkey_tui::App;
use latchkey_types::UiOptions;

pub async fn start_auth_mock() -> MockServer {
    MockServer::start().await
}

/// `/login` issues `token` for any credentials.
pub async fn mount_login_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;
}

/// `/login` answers 200 without a token field.
pub async fn mount_login_without_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(server)
        .await;
}

/// `/user` returns `name` when presented with `token`.
pub async fn mount_user(server: &MockServer, token: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": name })))
        .mount(server)
        .await;
}

/// `/user` rejects every request with `status`.
pub async fn mount_user_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> AuthClient {
    let url = Url::parse(&server.uri()).expect("mock server uri");
    AuthClient::new(url, &ClientOptions::default()).expect("client")
}

pub fn session_service(server: &MockServer, store: Arc<dyn CredentialStore>) -> Arc<SessionService> {
    Arc::new(SessionService::new(client_for(server), store))
}

pub fn app(server: &MockServer, store: Arc<dyn CredentialStore>) -> App {
    App::new(
        session_service(server, store),
        Arc::new(ThemeService::default()),
        UiOptions::default(),
    )
}
