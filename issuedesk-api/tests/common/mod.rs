//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test configuration without touching the process environment
//! - A router backed by the MySQL test database (`DATABASE_URL`)
//! - A router backed by a pool that can never connect
//! - Form posting and cookie helpers

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use issuedesk_api::{
    app::{build_router, AppState},
    config::Config,
    middleware::session::SESSION_COOKIE,
};
use issuedesk_shared::auth::session::{create_session_token, SessionClaims};
use issuedesk_shared::db::{
    pool::{create_lazy_pool, create_pool},
    schema::bootstrap_schema,
};
use sqlx::mysql::MySqlPool;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes-min";

/// `DATABASE_URL`, or the local test database
pub fn test_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mysql://root@localhost:3306/issuedesk_test".to_string())
}

/// Configuration with test defaults; `DATABASE_URL` is the only input
pub fn test_config(database_url: &str) -> Config {
    let database_url = database_url.to_string();
    Config::from_lookup(move |key| match key {
        "SECRET_KEY" => Some(TEST_SECRET.to_string()),
        "DATABASE_URL" => Some(database_url.clone()),
        "DATABASE_MAX_CONNECTIONS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Test context backed by a real database
pub struct TestContext {
    pub db: MySqlPool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Connects to the test database and bootstraps the schema
    ///
    /// Panics when the database is unreachable; callers are `#[ignore]`d
    /// so a plain `cargo test` does not need MySQL.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestContext::new`], with a hook to adjust the configuration
    pub async fn with_config<F>(customize: F) -> Self
    where
        F: FnOnce(&mut Config),
    {
        let mut config = test_config(&test_database_url());
        customize(&mut config);

        let db = create_pool(&config.database)
            .await
            .expect("Failed to connect to the test database");
        bootstrap_schema(&db).await.expect("Failed to bootstrap schema");

        let app = build_router(AppState::new(db.clone(), config.clone()));

        TestContext { db, app, config }
    }

    pub async fn get(&self, uri: &str, cookies: &str) -> Response {
        send(&self.app, get_request(uri, cookies)).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)], cookies: &str) -> Response {
        send(&self.app, form_request(uri, fields, cookies)).await
    }

    pub async fn signup(&self, name: &str, username: &str, password: &str) -> Response {
        self.post_form(
            "/signup",
            &[("name", name), ("username", username), ("password", password)],
            "",
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form(
            "/login",
            &[("username", username), ("password", password)],
            "",
        )
        .await
    }

    /// Signs up and logs in a fresh user, returning its username and the
    /// `Cookie` header value for its session
    pub async fn logged_in_user(&self) -> (String, String) {
        let username = unique_username("user");
        self.signup("Test User", &username, "correct horse battery staple")
            .await;
        let response = self.login(&username, "correct horse battery staple").await;

        let token = set_cookie_value(&response, SESSION_COOKIE)
            .expect("login should set a session cookie");
        (username, format!("{}={}", SESSION_COOKIE, token))
    }
}

/// Router whose pool points at a closed port
///
/// The pool is lazy with no warm connections, so `pool.size()` stays zero
/// unless a handler actually runs a query.
pub fn offline_app() -> (Router, MySqlPool) {
    offline_app_with(|_| {})
}

/// Like [`offline_app`], with a hook to adjust the configuration
pub fn offline_app_with<F>(customize: F) -> (Router, MySqlPool)
where
    F: FnOnce(&mut Config),
{
    let mut config = test_config("mysql://nobody@127.0.0.1:1/issuedesk");
    config.database.connect_timeout_seconds = 2;
    customize(&mut config);

    let pool = create_lazy_pool(&config.database).unwrap();
    let app = build_router(AppState::new(pool.clone(), config));
    (app, pool)
}

/// `Cookie` header value carrying a valid session for `username`
pub fn session_cookie(username: &str) -> String {
    let token = create_session_token(&SessionClaims::new(username), TEST_SECRET).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub fn get_request(uri: &str, cookies: &str) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, fields: &[(&str, &str)], cookies: &str) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().call(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Value of the named cookie in the response's `Set-Cookie` headers
pub fn set_cookie_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.to_string())
}
