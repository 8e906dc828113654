//! Error taxonomy shared by every operation, and its HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::infra::media::MediaError;
use crate::storage::StoreError;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already exist, Sign In instead or Try again !!";
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired, Please SignIn again";

/// Why a request could not be tied to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No token in the `Authorization` header or the `token` cookie.
    Missing,
    /// Signature verified but `exp` is in the past.
    Expired,
    /// Malformed token, bad signature, or unparsable subject.
    Invalid,
    /// Token is valid but its subject no longer exists.
    UnknownUser,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", DUPLICATE_EMAIL_MESSAGE)]
    DuplicateEmail,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidCredential(String),

    #[error("{}", unauthorized_message(.0))]
    Unauthorized(AuthFailure),

    #[error("{0}")]
    Forbidden(String),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn unauthorized_message(failure: &AuthFailure) -> &'static str {
    match failure {
        AuthFailure::Expired => TOKEN_EXPIRED_MESSAGE,
        AuthFailure::UnknownUser => "User no longer exists",
        AuthFailure::Missing | AuthFailure::Invalid => "Unauthorized",
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateEmail | AppError::InvalidCredential(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ExternalService(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Server-side failures are reduced to a generic text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ExternalService(_) | AppError::Internal(_) => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Internal(e) => tracing::error!(error = ?e, "request failed"),
            AppError::ExternalService(msg) => {
                tracing::error!(error = %msg, "external service failure")
            }
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
