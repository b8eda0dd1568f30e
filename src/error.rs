/*
 * Responsibility
 * - The app-wide AppError definition
 * - IntoResponse (HTTP status + JSON error body)
 * - Uniform conversion of auth / key-set / repo errors
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;
use crate::services::auth::jwks::JwksError;

/// `{"success": false, "error": <status>, "code": <code>, "message": <text>}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("signing key set unavailable: {0}")]
    KeySet(#[from] JwksError),
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("request timeout")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status(),
            AppError::KeySet(_) | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Auth(e) => (e.code(), e.to_string()),
            AppError::NotFound => ("not_found", self.to_string()),
            AppError::Unprocessable => ("unprocessable", self.to_string()),
            AppError::Timeout => ("request_timeout", self.to_string()),
            // Key-set failures are logged where they happen; don't leak the cause.
            AppError::KeySet(_) | AppError::Internal => (
                "internal_server_error",
                AppError::Internal.to_string(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = ?e, "repository failure");
        AppError::Internal
    }
}
