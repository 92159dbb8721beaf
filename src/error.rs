//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! handle and represent the error conditions that can occur, from storage
//! issues to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into HTTP responses carrying the standard
//! `{success, message, errors?}` envelope. It also provides `From` trait
//! implementations for `mongodb::error::Error`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError`, allowing for easy conversion with the `?`
//! operator.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError};
use actix_web::{web, HttpRequest, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::response::{ApiResponse, ErrorItem};
use crate::validation;

/// Represents all error conditions the application can surface to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing, invalid, or expired credentials (HTTP 401).
    Unauthorized(String),
    /// CSRF enforcement failure (HTTP 403).
    Forbidden(String),
    /// Malformed or unacceptable client request (HTTP 400).
    BadRequest(String),
    /// Requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Uniqueness conflict, e.g. a duplicate email registration.
    /// Rendered as HTTP 400 for compatibility with the existing clients.
    Conflict(String),
    /// Field-level validation failures (HTTP 400, enveloped `errors` list).
    Validation(Vec<ErrorItem>),
    /// Storage or otherwise unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(_) => write!(f, "Validation failed"),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => {
                HttpResponse::Unauthorized().json(ApiResponse::error(msg))
            }
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(ApiResponse::error(msg)),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ApiResponse::error(msg)),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ApiResponse::error(msg)),
            AppError::Conflict(msg) => HttpResponse::BadRequest().json(ApiResponse::error(msg)),
            AppError::Validation(items) => HttpResponse::BadRequest()
                .json(ApiResponse::error_with("validation failed", items.clone())),
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(ApiResponse::error(msg))
            }
        }
    }
}

/// Converts `mongodb::error::Error` into `AppError::Internal`.
///
/// Duplicate-key conflicts are recognized at the repository layer before this
/// conversion applies; anything reaching here is an unexpected storage error.
impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// formatting each rule failure into its client-facing message.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(validation::describe(&errors))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// Hashing only fails on underlying randomness or resource exhaustion.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

fn payload_error(message: String) -> actix_web::Error {
    AppError::Validation(vec![ErrorItem {
        field: None,
        message,
    }])
    .into()
}

/// JSON extractor configuration producing enveloped 400s for unparseable
/// bodies instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| payload_error(err.to_string()))
}

/// Query extractor configuration matching [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err: QueryPayloadError, _req: &HttpRequest| payload_error(err.to_string()))
}

/// Path extractor configuration matching [`json_config`].
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err: PathError, _req: &HttpRequest| payload_error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::Unauthorized("invalid email or password".into()), 401),
            (AppError::Forbidden("csrf token mismatch".into()), 403),
            (AppError::BadRequest("invalid task ID".into()), 400),
            (AppError::NotFound("task not found".into()), 404),
            (AppError::Conflict("email already exists".into()), 400),
            (AppError::Internal("storage unavailable".into()), 500),
        ];
        for (error, expected) in cases {
            let response = error.error_response();
            assert_eq!(response.status().as_u16(), expected, "for {:?}", error);
        }
    }

    #[test]
    fn test_validation_error_renders_field_list() {
        let error = AppError::Validation(vec![ErrorItem {
            field: Some("email".into()),
            message: "Invalid email format".into(),
        }]);
        let response = error.error_response();
        assert_eq!(response.status().as_u16(), 400);
    }
}
