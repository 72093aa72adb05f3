use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Unsupported authorization scheme")]
    UnsupportedScheme,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable kind, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::MissingAuthHeader => "missing_auth_header",
            AppError::UnsupportedScheme => "unsupported_scheme",
            AppError::InvalidRefreshToken => "invalid_refresh_token",
            AppError::InvalidApiKey => "invalid_api_key",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::Forbidden => "forbidden",
            AppError::Database(_) => "database",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::MissingAuthHeader
            | AppError::UnsupportedScheme
            | AppError::InvalidRefreshToken
            | AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(e) => {
                error!(error = %e, "Database failure while handling request");
                "Something went wrong on our end".to_string()
            }
            AppError::Internal(e) => {
                error!(error = %e, "Internal failure while handling request");
                "Something went wrong on our end".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message, "code": self.kind() }))).into_response()
    }
}
