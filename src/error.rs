//! Error handling module
//!
//! Provides the ingestion failure taxonomy and the HTTP-facing error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Ways an ingestion run can fail.
///
/// Both variants are recovered by the dataset service (cached snapshot, then
/// the synthetic dataset); they never reach the presentation layer.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Workbook source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("Workbook could not be parsed: {0}")]
    ParseFailure(String),
}

impl IngestError {
    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        IngestError::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        IngestError::ParseFailure(reason.into())
    }
}

impl From<calamine::XlsxError> for IngestError {
    fn from(err: calamine::XlsxError) -> Self {
        IngestError::ParseFailure(err.to_string())
    }
}

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}
