/// Error handling for the web server
///
/// Handlers return `AppResult<T>`; any error renders as an HTML error page
/// with the matching status code. Expected user mistakes (duplicate
/// username, wrong password) are not errors: handlers re-render the form
/// with a message instead.
///
/// # Example
///
/// ```
/// use issuedesk_api::error::{AppError, AppResult};
///
/// fn lookup(found: bool) -> AppResult<&'static str> {
///     if !found {
///         return Err(AppError::NotFound("No such issue".to_string()));
///     }
///     Ok("issue")
/// }
/// # assert!(lookup(false).is_err());
/// ```

use crate::templates;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use issuedesk_shared::auth::{password::PasswordError, session::SessionError};

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Unified handler error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::NotFound(msg) => msg,
            AppError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        };

        (status, templates::error_page(status, &message)).into_response()
    }
}

/// Convert sqlx errors to handler errors
///
/// Constraint violations (e.g. a knowledge article for an issue that does
/// not exist) are internal errors: the forms do no validation and the
/// database is the only line of defence.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to handler errors
impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session token errors to handler errors
///
/// Only reached when issuing a token fails; invalid incoming tokens are
/// handled by the session gate with a redirect.
impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::InternalError(format!("Session error: {}", err))
    }
}

/// Returns true if the error is a unique-key violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::InternalError("pool closed".to_string());
        assert_eq!(err.to_string(), "Internal error: pool closed");

        let err = AppError::NotFound("Issue not found".to_string());
        assert_eq!(err.to_string(), "Not found: Issue not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InternalError(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_database_errors_map_to_500() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::InternalError("password=hunter2".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("An internal error occurred"));
        assert!(!body.contains("hunter2"));
    }
}
