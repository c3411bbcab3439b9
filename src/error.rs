use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::jwt::AuthError;
use crate::store::StoreError;

/// Every way a request can fail, mapped to a status code at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    NotAllowed(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthenticated(_) | AppError::NotAllowed(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Token failures and internal errors are
    /// collapsed to a generic text; the detail only goes to the log.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Unauthenticated(_) => "Invalid or expired token".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => AppError::Conflict(format!("{field} already exists")),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Internal(e) => error!(error = ?e, "internal error"),
            AppError::Unauthenticated(reason) => tracing::warn!(%reason, "token rejected"),
            _ => {}
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
