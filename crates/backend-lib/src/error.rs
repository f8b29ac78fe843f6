// ============================
// crates/backend-lib/src/error.rs
// ============================
//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use embrace_common::FieldError;
use thiserror::Error;

/// Application error taxonomy.
///
/// Every variant maps to a fixed HTTP status and a fixed client-facing
/// message. The four bearer-credential failures are distinct variants so the
/// client can tell them apart, but they are otherwise handled identically.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    InvalidInput(String),

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    #[error("Password is incorrect")]
    PasswordIncorrect,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid or expired session")]
    InvalidOrExpiredSession,

    #[error("Admin access required")]
    AdminRequired,

    #[error("User not found")]
    AccountNotFound,

    #[error("Too many authentication attempts. Please try again later.")]
    RateLimited,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::CurrentPasswordIncorrect
            | AppError::PasswordIncorrect
            | AppError::MissingToken
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::InvalidOrExpiredSession => StatusCode::UNAUTHORIZED,
            AppError::AdminRequired => StatusCode::FORBIDDEN,
            AppError::AccountNotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap an unexpected store/crypto failure. The detail stays server-side;
    /// the client only ever sees the generic message.
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::Internal(ref err) = self {
            tracing::error!(error = %err, "internal error");
        } else {
            tracing::debug!(status = %status, message = %self, "request rejected");
        }

        let body = match &self {
            AppError::Validation(errors) => serde_json::json!({
                "success": false,
                "message": self.to_string(),
                "errors": errors,
            }),
            _ => serde_json::json!({
                "success": false,
                "message": self.to_string(),
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}
