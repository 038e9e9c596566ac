/// Cookie-based session gate
///
/// A successful login stores a signed session token in the `session`
/// cookie. Protected routes run [`require_session`], which validates the
/// token and inserts a [`CurrentUser`] into the request extensions. Requests
/// without a valid token are redirected to `/login` before any handler (or
/// the database) is reached.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use issuedesk_api::middleware::session::CurrentUser;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Logged in as {}", user.username)
/// }
/// ```

use crate::app::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use issuedesk_shared::auth::session::{
    create_session_token, validate_session_token, SessionClaims, SessionError,
};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// The logged-in user, added to request extensions by [`require_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Username the session was issued for
    pub username: String,
}

/// Resolves the session cookie to a user, if it carries a valid token
pub fn current_user(jar: &CookieJar, secret: &str) -> Option<CurrentUser> {
    let cookie = jar.get(SESSION_COOKIE)?;

    match validate_session_token(cookie.value(), secret) {
        Ok(claims) => Some(CurrentUser {
            username: claims.sub,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring session cookie");
            None
        }
    }
}

/// Adds a fresh session cookie for `username`
///
/// The cookie itself has no expiry; the token inside it does.
pub fn start_session(
    jar: CookieJar,
    state: &AppState,
    username: &str,
) -> Result<CookieJar, SessionError> {
    let ttl = Duration::hours(state.config.session.ttl_hours);
    let claims = SessionClaims::with_expiration(username, ttl);
    let token = create_session_token(&claims, state.session_secret())?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.server.secure_cookies);

    Ok(jar.add(cookie))
}

/// Removes the session cookie
pub fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Session gate middleware
///
/// Redirects (303) to `/login` when the session cookie is missing, expired,
/// or signed with another key.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    match current_user(&jar, state.session_secret()) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "No valid session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        routing::get,
        Extension, Router,
    };
    use issuedesk_shared::db::pool::create_lazy_pool;
    use tower::Service as _;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn state() -> AppState {
        let mut config = Config::from_lookup(|key| match key {
            "SECRET_KEY" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        config.database.url = Some("mysql://nobody@127.0.0.1:1/none".to_string());

        let pool = create_lazy_pool(&config.database).unwrap();
        AppState::new(pool, config)
    }

    fn app(state: AppState) -> Router {
        async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
            user.username
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_session,
            ))
            .with_state(state)
    }

    fn token(username: &str, secret: &str) -> String {
        create_session_token(&SessionClaims::new(username), secret).unwrap()
    }

    #[tokio::test]
    async fn test_missing_cookie_redirects() {
        let mut app = app(state());

        let response = app
            .call(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_valid_cookie_passes_user_through() {
        let mut app = app(state());

        let response = app
            .call(
                Request::builder()
                    .uri("/whoami")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token("alice", SECRET)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn test_foreign_signature_redirects() {
        let mut app = app(state());
        let forged = token("alice", "some-other-secret-that-is-32-bytes-long");

        let response = app
            .call(
                Request::builder()
                    .uri("/whoami")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, forged))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_start_and_end_session() {
        let state = state();

        let jar = start_session(CookieJar::new(), &state, "bob").unwrap();
        let user = current_user(&jar, SECRET).unwrap();
        assert_eq!(user.username, "bob");

        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        let jar = end_session(jar);
        assert!(current_user(&jar, SECRET).is_none());
    }
}
