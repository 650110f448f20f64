//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type every handler returns. Each variant maps to
//! one HTTP status, and `ResponseError` renders it inside the same `{status, message, data}`
//! envelope that successful responses use, so clients never see a bare framework error.
//!
//! `From` conversions exist for `validator::ValidationErrors`, `StoreError` and `TokenError`,
//! allowing handlers to use `?` throughout.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::response::Envelope;
use crate::store::StoreError;

/// Represents all possible errors that can occur while serving a request.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or semantically invalid request (HTTP 400).
    BadRequest(String),
    /// Missing or invalid credentials (HTTP 401).
    Unauthorized(String),
    /// The requested record does not exist (HTTP 404).
    NotFound(String),
    /// The request collides with existing state, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Unexpected server-side failure whose message is safe to show (HTTP 500).
    InternalServerError(String),
    /// Store failure (HTTP 500). The detail is logged, not sent to the client.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The message placed in the response envelope.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg) => msg,
            AppError::DatabaseError(_) => "Internal server error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::DatabaseError(detail) | AppError::InternalServerError(detail) = self {
            log::error!("{}: {}", self.status_code(), detail);
        }
        Envelope::<()>::empty(self.status_code(), self.client_message())
    }
}

/// The first message attached to a failed rule is used; rules without one fall back to
/// the generic payload error.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request payload".to_string());
        AppError::BadRequest(message)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Every token failure looks the same to the client; the reason only reaches the log.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized("Invalid token".into())
    }
}
