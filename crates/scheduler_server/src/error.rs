//! HTTP error mapping.
//!
//! # Invariants
//! - Client errors carry their message in `{"error": ...}` with 4xx status.
//! - Internal errors are logged with call site and operation, and the client
//!   only sees a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use scheduler_core::TaskServiceError;
use serde::Serialize;
use std::fmt::Display;
use std::panic::Location;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    /// Already logged when constructed.
    Internal,
}

impl ApiError {
    /// Client error prefixed with what the handler was doing.
    pub fn bad_request(context: &str, err: impl Display) -> Self {
        Self::BadRequest(format!("{context}: {err}"))
    }

    /// Logs `err` with the caller's location and returns the opaque variant.
    #[track_caller]
    pub fn internal(operation: &str, err: impl Display) -> Self {
        let location = Location::caller();
        error!(
            "event=api_error module=server status=error operation={operation} location={}:{} error={err}",
            location.file(),
            location.line()
        );
        Self::Internal
    }

    #[track_caller]
    pub fn from_service(operation: &str, err: TaskServiceError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::internal(operation, err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
