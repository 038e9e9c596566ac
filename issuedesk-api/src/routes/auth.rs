/// Account endpoints
///
/// - `GET/POST /signup` - Create an account
/// - `GET/POST /login` - Log in and start a session
/// - `GET /logout` - End the session
///
/// Duplicate usernames and bad credentials re-render the form with a
/// message; everything else that goes wrong is an [`AppError`].

use crate::{
    app::AppState,
    error::{is_unique_violation, AppError, AppResult},
    flash,
    middleware::session::{end_session, start_session},
    templates,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use issuedesk_shared::{
    auth::password,
    models::{
        login_attempt::{LoginAttempt, LoginStatus},
        user::{CreateUser, User},
    },
};
use serde::Deserialize;

const DUPLICATE_USERNAME: &str = "Username already exists! Please choose another.";
const SIGNUP_SUCCESSFUL: &str = "Signup successful! Please login.";
const INVALID_CREDENTIALS: &str = "Invalid credentials!";

/// Signup form fields
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    /// Display name
    pub name: String,

    /// Login name
    pub username: String,

    /// Plain password, hashed before storage
    pub password: String,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Renders the signup form
pub async fn signup_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, templates::signup_page(&flashes))
}

/// Creates an account
///
/// On success the user is sent to the login page; no session is started.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if User::find_by_username(&state.db, &form.username)
        .await?
        .is_some()
    {
        tracing::info!(username = %form.username, "Signup rejected: username taken");
        return Ok(duplicate_username(jar));
    }

    let password_hash = password::hash_password(&form.password)?;

    let created = User::create(
        &state.db,
        CreateUser {
            name: Some(form.name),
            username: form.username.clone(),
            password_hash,
        },
    )
    .await;

    match created {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::info!(username = %form.username, "Signup rejected: username taken concurrently");
            return Ok(duplicate_username(jar));
        }
        Err(e) => return Err(AppError::from(e)),
    }

    let jar = flash::push(jar, state.config.server.secure_cookies, SIGNUP_SUCCESSFUL);
    Ok((jar, Redirect::to("/login")).into_response())
}

fn duplicate_username(jar: CookieJar) -> Response {
    let (jar, mut flashes) = flash::take(jar);
    flashes.push(DUPLICATE_USERNAME.to_string());
    (jar, templates::signup_page(&flashes)).into_response()
}

/// Renders the login form
pub async fn login_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, templates::login_page(&flashes))
}

/// Checks credentials and starts a session
///
/// Every attempt is appended to the login log under the username as typed,
/// whether or not such a user exists.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let user = User::find_by_username(&state.db, &form.username).await?;

    let verified = match &user {
        Some(user) => match password::verify_password(&form.password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Stored password hash is unusable");
                false
            }
        },
        None => false,
    };

    match user {
        Some(user) if verified => {
            LoginAttempt::record(&state.db, &form.username, LoginStatus::Success).await?;
            tracing::info!(user_id = user.id, username = %user.username, "Login succeeded");

            let jar = start_session(jar, &state, &user.username)?;
            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => {
            LoginAttempt::record(&state.db, &form.username, LoginStatus::Failed).await?;
            tracing::info!(username = %form.username, "Login failed");

            let (jar, mut flashes) = flash::take(jar);
            flashes.push(INVALID_CREDENTIALS.to_string());
            Ok((jar, templates::login_page(&flashes)).into_response())
        }
    }
}

/// Ends the session
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/login"))
}
