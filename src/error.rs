//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the one error type every handler returns.
//! Inner components (credential checks, the authorization gate, the stores)
//! report their expected failures as their own small enums; those are folded
//! into `AppError` through `From` impls so handlers can use `?` throughout.
//!
//! `AppError` implements `actix_web::error::ResponseError`, which is the single
//! place where the taxonomy is turned into HTTP status codes and `{"error": ...}`
//! bodies. Authentication failures and missing tasks always render the same
//! body no matter which check failed, and server-side failures never echo their
//! detail to the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::credentials;

/// Body used for every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
/// Body used for every 404 response.
pub const NOT_FOUND_MESSAGE: &str = "Task not found";
/// Body used when no route matches the path and method.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Not Found";
/// Body used for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Validation or business-rule failure (HTTP 400). The message is shown to the user.
    BadRequest(String),
    /// Any authentication or authorization failure (HTTP 401).
    /// Carries no detail: callers cannot tell which check failed.
    Unauthorized,
    /// Missing or foreign-owned task (HTTP 404).
    NotFound,
    /// No route matches the request's path and method (HTTP 404).
    RouteNotFound,
    /// Request body or path could not be parsed (HTTP 422).
    UnprocessableEntity(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the database (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::NotFound => write!(f, "Not Found"),
            AppError::RouteNotFound => write!(f, "Route Not Found"),
            AppError::UnprocessableEntity(msg) => write!(f, "Unprocessable Entity: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// The text placed in the `error` field of the response body.
    fn public_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) | AppError::UnprocessableEntity(msg) => msg,
            AppError::Unauthorized => UNAUTHORIZED_MESSAGE,
            AppError::NotFound => NOT_FOUND_MESSAGE,
            AppError::RouteNotFound => ROUTE_NOT_FOUND_MESSAGE,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "error": self.public_message()
        }))
    }
}

/// `RowNotFound` only surfaces from single-row task queries, so it maps to the
/// uniform 404. Everything else is a database failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound,
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Keeps the first user-facing credential message, username rules first.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let message =
            credentials::first_message(&errors).unwrap_or_else(|| errors.to_string());
        AppError::BadRequest(message)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn test_error_responses() {
        let (status, body) = body_of(AppError::BadRequest("User already exists".into())).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "User already exists"}));

        let (status, body) = body_of(AppError::Unauthorized).await;
        assert_eq!(status, 401);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let (status, body) = body_of(AppError::NotFound).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "Task not found"}));

        let (status, body) = body_of(AppError::RouteNotFound).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({"error": "Not Found"}));

        let (status, _) = body_of(AppError::UnprocessableEntity("bad json".into())).await;
        assert_eq!(status, 422);
    }

    #[actix_rt::test]
    async fn test_server_errors_hide_detail() {
        let (status, body) =
            body_of(AppError::DatabaseError("no such table: tasks".into())).await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({"error": "Internal Server Error"}));

        let (status, body) = body_of(AppError::InternalServerError("boom".into())).await;
        assert_eq!(status, 500);
        assert_eq!(body, json!({"error": "Internal Server Error"}));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::DatabaseError(_)
        ));
    }
}
