use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with, mapped onto an HTTP status and a
/// `{"error": "..."}` body at the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No Authorization header, or one that is not `Bearer <token>`.
    #[error("Access denied")]
    AuthenticationRequired,
    /// Signature check or expiry failed. Callers cannot tell which.
    #[error("Invalid token")]
    InvalidToken,
    #[error("User already exists")]
    DuplicateUsername,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Blog not found")]
    NotFound,
    /// Authenticated, but not the owner of the target record.
    #[error("Unauthorized")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("database error")]
    Store(#[source] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::DuplicateUsername
            | ApiError::InvalidCredentials
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return ApiError::NotFound;
        }
        let unique = e
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            return ApiError::DuplicateUsername;
        }
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Backend failures are logged with their source chain but reach the
        // client as a fixed message.
        let message = match &self {
            ApiError::Store(_) | ApiError::Internal(_) => {
                error!(error = ?self, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
