//! Error handling module for the Meetling server.
//!
//! Provides the central error type with mapping to HTTP status codes and response bodies.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Kind names written to the `__type__` field of error bodies.
pub mod kinds {
    pub const INPUT_ERROR: &str = "InputError";
    pub const PERMISSION_ERROR: &str = "PermissionError";
}

/// Why a single input field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// Required field was not supplied.
    Missing,
    /// Field value has a type that is not accepted.
    BadType,
    /// Field value is blank after trimming.
    Empty,
}

/// Field-level input errors, collected over a whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputError {
    pub errors: BTreeMap<String, ErrorReason>,
}

impl InputError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error.
    pub fn field(name: &str, reason: ErrorReason) -> Self {
        let mut e = Self::new();
        e.insert(name, reason);
        e
    }

    pub fn insert(&mut self, name: &str, reason: ErrorReason) {
        self.errors.insert(name.to_string(), reason);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Err(self)` if any error was collected, `Ok(())` otherwise.
    pub fn into_result(self) -> Result<(), InputError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .errors
            .iter()
            .map(|(name, reason)| format!("{name}: {reason:?}"))
            .collect();
        write!(f, "invalid input ({})", fields.join(", "))
    }
}

impl std::error::Error for InputError {}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request arguments
    Input(InputError),
    /// Current user may not perform the operation
    Permission,
    /// Unknown identifier
    NotFound(String),
    /// Undecodable request body
    BadRequest(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Permission => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Expected failures are part of normal operation and are not logged as errors.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::Input(_) | AppError::Permission | AppError::NotFound(_)
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Input(e) => write!(f, "{e}"),
            AppError::Permission => write!(f, "permission denied"),
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::Database(msg) => write!(f, "database error: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::Input(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

/// Body of an input error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct InputErrorBody {
    #[serde(rename = "__type__")]
    pub kind: String,
    pub errors: BTreeMap<String, ErrorReason>,
}

/// Body of a permission error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionErrorBody {
    #[serde(rename = "__type__")]
    pub kind: String,
}

/// Plain status response with the canonical reason as body.
pub fn status_response(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    (status, reason).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Input(e) => {
                let body = InputErrorBody {
                    kind: kinds::INPUT_ERROR.to_string(),
                    errors: e.errors,
                };
                (status, Json(body)).into_response()
            }
            AppError::Permission => {
                let body = PermissionErrorBody {
                    kind: kinds::PERMISSION_ERROR.to_string(),
                };
                (status, Json(body)).into_response()
            }
            AppError::NotFound(_) | AppError::BadRequest(_) => status_response(status),
            err @ (AppError::Database(_) | AppError::Internal(_)) => {
                tracing::error!(error = %err, "Unexpected error while handling request");
                status_response(status)
            }
        }
    }
}
