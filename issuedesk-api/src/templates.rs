/// Server-rendered HTML pages
///
/// Every page shares one layout: a navigation bar (links depend on whether
/// someone is logged in), the pending flash messages, then the page body.
/// All values that come from users or the database go through [`escape`].

use axum::{http::StatusCode, response::Html};
use chrono::{DateTime, Utc};
use issuedesk_shared::models::{issue::Issue, knowledge_article::KnowledgeArticle};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #f6f7f9; color: #222; }
nav { background: #243447; padding: 0.75rem 1.5rem; }
nav a, nav span { color: #fff; margin-right: 1rem; text-decoration: none; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
.flash { background: #fff8d6; border: 1px solid #e6d27a; padding: 0.5rem 1rem; margin-bottom: 0.5rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { border-bottom: 1px solid #ddd; padding: 0.5rem; text-align: left; vertical-align: top; }
.status-open { color: #b35900; font-weight: bold; }
.status-closed { color: #2e7d32; }
form.stacked label { display: block; margin-top: 0.75rem; }
form.stacked input, form.stacked textarea { width: 100%; max-width: 480px; }
article { background: #fff; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
"#;

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn layout(title: &str, username: Option<&str>, flashes: &[String], body: &str) -> Html<String> {
    let mut nav = String::new();
    match username {
        Some(name) => {
            let _ = write!(
                nav,
                r#"<span>Logged in as <strong>{}</strong></span><a href="/issues">Issues</a><a href="/report">Report issue</a><a href="/restart_server">Restart server</a><a href="/logout">Logout</a>"#,
                escape(name)
            );
        }
        None => nav.push_str(r#"<a href="/login">Login</a><a href="/signup">Sign up</a>"#),
    }

    let mut messages = String::new();
    for message in flashes {
        let _ = write!(messages, r#"<div class="flash">{}</div>"#, escape(message));
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - IssueDesk</title>
<style>{STYLE}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
{messages}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

/// Login form
pub fn login_page(flashes: &[String]) -> Html<String> {
    layout(
        "Login",
        None,
        flashes,
        r#"<h1>Login</h1>
<form class="stacked" method="post" action="/login">
<label>Username <input type="text" name="username" autocomplete="username"></label>
<label>Password <input type="password" name="password" autocomplete="current-password"></label>
<p><button type="submit">Login</button></p>
</form>
<p>No account yet? <a href="/signup">Sign up</a></p>"#,
    )
}

/// Signup form
pub fn signup_page(flashes: &[String]) -> Html<String> {
    layout(
        "Sign up",
        None,
        flashes,
        r#"<h1>Sign up</h1>
<form class="stacked" method="post" action="/signup">
<label>Name <input type="text" name="name" autocomplete="name"></label>
<label>Username <input type="text" name="username" autocomplete="username"></label>
<label>Password <input type="password" name="password" autocomplete="new-password"></label>
<p><button type="submit">Sign up</button></p>
</form>
<p>Already registered? <a href="/login">Login</a></p>"#,
    )
}

/// Issue list, most recent first as given
pub fn issue_list_page(username: &str, issues: &[Issue], flashes: &[String]) -> Html<String> {
    let mut body = String::from("<h1>Issues</h1>\n");

    if issues.is_empty() {
        body.push_str(r#"<p>No issues reported yet. <a href="/report">Report one</a>.</p>"#);
        return layout("Issues", Some(username), flashes, &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>#</th><th>Module</th><th>Description</th><th>Status</th><th>Reported</th><th>Closed</th><th></th></tr></thead>\n<tbody>\n",
    );

    for issue in issues {
        let action = if issue.status.is_open() {
            format!(
                r#"<form method="post" action="/close_issue/{id}"><button type="submit">Close</button></form>"#,
                id = issue.id
            )
        } else {
            String::new()
        };

        let _ = writeln!(
            body,
            r#"<tr id="issue-{id}"><td>{id}</td><td>{module}</td><td>{description}</td><td class="status-{status}">{status}</td><td>{created}</td><td>{closed}</td><td>{action}<a href="/knowledge_article/{id}">Knowledge article</a></td></tr>"#,
            id = issue.id,
            module = escape(&issue.module),
            description = escape(&issue.description),
            status = issue.status,
            created = timestamp(&issue.created_at),
            closed = issue.closed_at.as_ref().map(timestamp).unwrap_or_default(),
            action = action,
        );
    }

    body.push_str("</tbody>\n</table>");
    layout("Issues", Some(username), flashes, &body)
}

/// Report-issue form
pub fn report_page(username: &str, flashes: &[String]) -> Html<String> {
    layout(
        "Report issue",
        Some(username),
        flashes,
        r#"<h1>Report an issue</h1>
<form class="stacked" method="post" action="/report">
<label>Module <input type="text" name="module"></label>
<label>Description <textarea name="description" rows="6"></textarea></label>
<p><button type="submit">Report</button></p>
</form>"#,
    )
}

/// Knowledge article form with the issue it documents
pub fn knowledge_article_page(
    username: &str,
    issue_id: i32,
    issue: Option<&Issue>,
    articles: &[KnowledgeArticle],
    flashes: &[String],
) -> Html<String> {
    let mut body = format!("<h1>Knowledge article for issue #{}</h1>\n", issue_id);

    match issue {
        Some(issue) => {
            let _ = writeln!(
                body,
                r#"<table><tbody><tr><th>Module</th><td>{}</td></tr><tr><th>Description</th><td>{}</td></tr><tr><th>Status</th><td class="status-{status}">{status}</td></tr></tbody></table>"#,
                escape(&issue.module),
                escape(&issue.description),
                status = issue.status,
            );
        }
        None => body.push_str("<p>Issue not found.</p>\n"),
    }

    if !articles.is_empty() {
        body.push_str("<h2>Existing articles</h2>\n");
        for article in articles {
            let _ = writeln!(
                body,
                "<article><h3>{}</h3><p><small>by {} on {}</small></p><p>{}</p></article>",
                escape(&article.title),
                escape(&article.author),
                timestamp(&article.created_at),
                escape(&article.content),
            );
        }
    }

    let _ = write!(
        body,
        r#"<h2>Write an article</h2>
<form class="stacked" method="post" action="/knowledge_article/{issue_id}">
<label>Title <input type="text" name="title"></label>
<label>Resolution <textarea name="content" rows="10"></textarea></label>
<p><button type="submit">Save article</button></p>
</form>"#
    );

    layout("Knowledge article", Some(username), flashes, &body)
}

/// Generic error page
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let body = format!(
        r#"<h1>{} {}</h1>
<p>{}</p>
<p><a href="/">Back to issues</a></p>"#,
        status.as_u16(),
        escape(status.canonical_reason().unwrap_or("Error")),
        escape(message),
    );

    layout("Error", None, &[], &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuedesk_shared::models::issue::IssueStatus;

    fn issue(id: i32, status: IssueStatus) -> Issue {
        Issue {
            id,
            user_id: Some(1),
            module: "Billing".to_string(),
            description: "<script>alert(1)</script>".to_string(),
            status,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_flashes_are_rendered_escaped() {
        let Html(page) = login_page(&["Invalid credentials! <b>".to_string()]);
        assert!(page.contains(r#"<div class="flash">Invalid credentials! &lt;b&gt;</div>"#));
    }

    #[test]
    fn test_issue_list_escapes_user_content() {
        let Html(page) = issue_list_page("alice", &[issue(1, IssueStatus::Open)], &[]);

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("Logged in as <strong>alice</strong>"));
    }

    #[test]
    fn test_close_button_only_for_open_issues() {
        let Html(page) = issue_list_page(
            "alice",
            &[issue(1, IssueStatus::Open), issue(2, IssueStatus::Closed)],
            &[],
        );

        assert!(page.contains(r#"action="/close_issue/1""#));
        assert!(!page.contains(r#"action="/close_issue/2""#));
        assert!(page.contains(r#"href="/knowledge_article/2""#));
    }

    #[test]
    fn test_issue_list_preserves_order() {
        let Html(page) = issue_list_page(
            "alice",
            &[issue(7, IssueStatus::Open), issue(3, IssueStatus::Open)],
            &[],
        );

        let newer = page.find(r#"id="issue-7""#).unwrap();
        let older = page.find(r#"id="issue-3""#).unwrap();
        assert!(newer < older);
    }

    #[test]
    fn test_empty_issue_list() {
        let Html(page) = issue_list_page("alice", &[], &[]);
        assert!(page.contains("No issues reported yet"));
    }

    #[test]
    fn test_knowledge_page_for_missing_issue() {
        let Html(page) = knowledge_article_page("alice", 99, None, &[], &[]);

        assert!(page.contains("Issue not found."));
        assert!(page.contains(r#"action="/knowledge_article/99""#));
    }

    #[test]
    fn test_error_page() {
        let Html(page) = error_page(StatusCode::NOT_FOUND, "No such page");

        assert!(page.contains("404 Not Found"));
        assert!(page.contains("No such page"));
    }
}
