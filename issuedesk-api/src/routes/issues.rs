/// Issue endpoints
///
/// - `GET /`, `GET /issues` - Issue list, most recent first
/// - `GET/POST /report` - Report an issue
/// - `POST /close_issue/:issue_id` - Close an issue
/// - `GET /restart_server` - Logged no-op

use crate::{
    app::AppState,
    error::AppResult,
    flash,
    middleware::session::{current_user, CurrentUser},
    templates,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use issuedesk_shared::models::{
    issue::{CreateIssue, Issue},
    user::User,
};
use serde::Deserialize;

const ISSUE_REPORTED: &str = "Issue reported!";
const ISSUE_CLOSED_WRITE_ARTICLE: &str =
    "Issue closed successfully. Please create a knowledge article about the resolution.";
const ISSUE_CLOSED: &str = "Issue closed.";
const RESTART_SIMULATED: &str = "Server restart simulated. Check logs for details.";

/// Report form fields
#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub module: String,
    pub description: String,
}

/// Home page: same content as `/issues`
pub async fn index(
    state: State<AppState>,
    user: Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<Response> {
    list_issues(state, user, jar).await
}

/// Lists every issue, most recent first
pub async fn list_issues(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<Response> {
    let issues = Issue::list_recent_first(&state.db).await?;
    let (jar, flashes) = flash::take(jar);

    Ok((
        jar,
        templates::issue_list_page(&user.username, &issues, &flashes),
    )
        .into_response())
}

/// Renders the report form
pub async fn report_form(
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, templates::report_page(&user.username, &flashes))
}

/// Creates an open issue owned by the session user
///
/// A session whose user row has gone away still reports, with no owner.
pub async fn report_issue(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
    Form(form): Form<ReportForm>,
) -> AppResult<Response> {
    let user_id = User::id_for_username(&state.db, &user.username).await?;

    let issue = Issue::create(
        &state.db,
        CreateIssue {
            user_id,
            module: form.module,
            description: form.description,
        },
    )
    .await?;

    tracing::info!(
        issue_id = issue.id,
        module = %issue.module,
        username = %user.username,
        "Issue reported"
    );

    let jar = flash::push(jar, state.config.server.secure_cookies, ISSUE_REPORTED);
    Ok((jar, Redirect::to("/")).into_response())
}

/// Closes an issue
///
/// There is no existence check; an unknown id updates nothing. Closing
/// twice keeps the first `closed_at`.
pub async fn close_issue(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(issue_id): Path<i32>,
    jar: CookieJar,
) -> AppResult<Response> {
    Issue::close(&state.db, issue_id).await?;

    tracing::info!(issue_id, username = %user.username, "Issue closed");

    if state.config.features.knowledge_articles {
        let jar = flash::push(
            jar,
            state.config.server.secure_cookies,
            ISSUE_CLOSED_WRITE_ARTICLE,
        );
        let target = format!("/knowledge_article/{}", issue_id);
        Ok((jar, Redirect::to(&target)).into_response())
    } else {
        let jar = flash::push(jar, state.config.server.secure_cookies, ISSUE_CLOSED);
        Ok((jar, Redirect::to("/issues")).into_response())
    }
}

/// Pretends to restart the server
///
/// Nothing is restarted. The request is logged so operators can see who
/// asked, and `/` takes care of sending anonymous visitors to the login.
pub async fn restart_server(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let requested_by = current_user(&jar, state.session_secret()).map(|user| user.username);

    tracing::warn!(
        requested_by = requested_by.as_deref().unwrap_or("anonymous"),
        "Server restart requested; restarts are not performed by the application"
    );

    let jar = flash::push(jar, state.config.server.secure_cookies, RESTART_SIMULATED);
    (jar, Redirect::to("/"))
}
