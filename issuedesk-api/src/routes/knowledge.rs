/// Knowledge article endpoints
///
/// - `GET /knowledge_article/:issue_id` - Issue context, existing articles, form
/// - `POST /knowledge_article/:issue_id` - Attach an article to the issue

use crate::{app::AppState, error::AppResult, flash, middleware::session::CurrentUser, templates};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use issuedesk_shared::models::{
    issue::Issue,
    knowledge_article::{CreateKnowledgeArticle, KnowledgeArticle},
};
use serde::Deserialize;

const ARTICLE_CREATED: &str = "Knowledge article created successfully.";

/// Article form fields
#[derive(Debug, Deserialize)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
}

/// Renders the article form
///
/// An unknown issue id still renders, with a note in place of the issue.
pub async fn knowledge_article_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(issue_id): Path<i32>,
    jar: CookieJar,
) -> AppResult<Response> {
    let issue = Issue::find_by_id(&state.db, issue_id).await?;
    let articles = KnowledgeArticle::list_by_issue(&state.db, issue_id).await?;
    let (jar, flashes) = flash::take(jar);

    Ok((
        jar,
        templates::knowledge_article_page(
            &user.username,
            issue_id,
            issue.as_ref(),
            &articles,
            &flashes,
        ),
    )
        .into_response())
}

/// Stores an article written by the session user
///
/// The issue may be open or closed. An unknown issue id fails on the
/// foreign key.
pub async fn create_knowledge_article(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(issue_id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<ArticleForm>,
) -> AppResult<Response> {
    let article_id = KnowledgeArticle::create(
        &state.db,
        CreateKnowledgeArticle {
            issue_id,
            author: user.username.clone(),
            title: form.title,
            content: form.content,
        },
    )
    .await?;

    tracing::info!(article_id, issue_id, author = %user.username, "Knowledge article created");

    let jar = flash::push(jar, state.config.server.secure_cookies, ARTICLE_CREATED);
    Ok((jar, Redirect::to("/")).into_response())
}
