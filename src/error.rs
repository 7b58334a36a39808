use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::store::StoreError;

/// Failure of a single API operation.
#[derive(Debug, Display)]
pub enum AppError {
    /// Malformed or missing input; `field` names the offending form field.
    #[display(fmt = "{}: {}", field, message)]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Duplicate registration, or a period that was already decided.
    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    /// Opaque storage failure, already logged where it happened.
    #[display(fmt = "storage failure: {}", _0)]
    Storage(String),
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(what) => {
                AppError::Conflict(format!("{what} already exists"))
            }
            StoreError::Backend(message) => AppError::Storage(message),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { field, message } => json!({
                "message": message,
                "field": field
            }),
            // storage details stay in the log
            AppError::Storage(_) => json!({
                "message": "Something went wrong, Contact with system admin"
            }),
            other => json!({ "message": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
