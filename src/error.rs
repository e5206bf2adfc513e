//! Error types for the Local Library server

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::forms::FieldErrors;

/// Stable error codes exposed in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    Forbidden = 3,
    DbFailure = 4,
    NoSuchEntry = 5,
    BadValue = 6,
    InvalidForm = 7,
    LoginRequired = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Login required to access {next}")]
    LoginRequired { next: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid form submission")]
    InvalidForm(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Login page that anonymous visitors are sent to
pub const LOGIN_URL: &str = "/accounts/login/";

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Field-level messages for rejected form submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl AppError {
    /// Single-field form error
    pub fn invalid_field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        AppError::InvalidForm(errors)
    }

    /// Maps constraint violations raised by a write onto the offending form field.
    ///
    /// Constraint names follow the Postgres defaults (`books_author_id_fkey`,
    /// `genres_name_key`, ...), so the referencing column names the field.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let field = db.constraint().map(constraint_field).unwrap_or("__all__");
            if db.is_foreign_key_violation() {
                return Self::invalid_field(field, "Select a valid choice.");
            }
            if db.is_unique_violation() {
                return Self::invalid_field(field, "An entry with this value already exists.");
            }
            if db.is_check_violation() {
                return Self::invalid_field(field, "Value not allowed.");
            }
        }
        AppError::Database(err)
    }
}

fn constraint_field(constraint: &str) -> &'static str {
    const FIELDS: [(&str, &str); 6] = [
        ("author_id", "author"),
        ("language_id", "language"),
        ("genre_id", "genre"),
        ("book_id", "book"),
        ("borrower_id", "borrower"),
        ("name", "name"),
    ];
    FIELDS
        .iter()
        .find(|(column, _)| constraint.contains(column))
        .map(|(_, field)| *field)
        .unwrap_or("__all__")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated, msg, None)
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg, None)
            }
            AppError::LoginRequired { next } => {
                let location = format!("{}?next={}", LOGIN_URL, next);
                let body = Json(ErrorResponse {
                    code: ErrorCode::LoginRequired as u32,
                    error: format!("{:?}", ErrorCode::LoginRequired),
                    message: "Login required".to_string(),
                    fields: None,
                });
                return (StatusCode::FOUND, [(LOCATION, location)], body).into_response();
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntry, msg, None)
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, None)
            }
            AppError::InvalidForm(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidForm,
                "Please correct the errors below".to_string(),
                Some(errors),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
