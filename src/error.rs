//! Error types for gs-questions

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type used throughout the service
pub type Result<T> = std::result::Result<T, Error>;

/// Service error types
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote content retrieval error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request payload (400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Field decryption failure. Never swallowed: storing garbled
    /// plaintext is worse than losing the sync cycle.
    #[error("Decryption failed: {0}")]
    Decrypt(String),

    /// All eight answer choice letters are already assigned
    #[error("No answer choice slots remain for question {0}")]
    ChoicesExhausted(i64),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Error::Http(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HTTP_ERROR"),
            Error::Decrypt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DECRYPT_ERROR"),
            Error::ChoicesExhausted(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHOICES_EXHAUSTED"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
