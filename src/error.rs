//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type shared by the services, stores and
//! route handlers. Every variant maps to one HTTP status code, and every error
//! response has the same shape: `{"message": "..."}`.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and actix's
//! `BlockingError` let the `?` operator do the conversion at each call site.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::StatusCode,
    HttpResponse,
};
use jsonwebtoken::errors::ErrorKind;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for any 500. Details only go to the log.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    Validation(String),
    /// A uniqueness constraint would be violated (HTTP 409).
    Conflict(String),
    /// Missing, invalid or expired credentials (HTTP 401).
    Unauthorized(String),
    /// The entity does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Store failure (HTTP 500).
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message exposed to the client.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.as_str(),
            AppError::Database(_) | AppError::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

/// Converts `AppError` variants into JSON `HttpResponse`s.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.public_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict` so that a registration racing
/// another one for the same username still answers 409.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Username or email already exists".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// Field messages are joined in field-name order so the response is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();

        if messages.is_empty() {
            AppError::Validation("Invalid input".into())
        } else {
            AppError::Validation(messages.join("; "))
        }
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthorized("Token has expired".into()),
            _ => AppError::Unauthorized("Token is invalid".into()),
        }
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Converts a failed `web::block` call (the blocking pool is gone or the
/// closure panicked) into `AppError::Internal`.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::Internal(format!("Blocking task failed: {}", error))
    }
}
