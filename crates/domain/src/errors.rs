//! Planner error kinds with HTTP status code mappings.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Wire shape for a failed planner request.
///
/// `kind` is a stable machine-readable discriminator: reservation callers
/// branch on no_seats / expired / cannot_release to drive retry or re-hold
/// flows, so those outcomes must be distinguishable without parsing the
/// human-readable message. `details` carries per-field validation messages
/// and is omitted otherwise.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Planner errors with HTTP status code mappings.
///
/// Solver outcomes are not errors: an unsatisfiable or timed-out plan is
/// returned as data (a partial or empty plan), never raised.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Malformed request: missing pathway reference, bad term label,
    /// unknown course id (400 Bad Request)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Multiple validation errors (400 Bad Request)
    #[error("Request validation failed")]
    ValidationErrors(Vec<String>),

    /// Resource not found (404 Not Found)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Capacity exhausted for a reservation create or commit (409 Conflict)
    #[error("No seats available: {0}")]
    NoSeats(String),

    /// Commit attempted on a reservation past its hold window (409 Conflict)
    #[error("Reservation expired")]
    Expired,

    /// Release attempted on a committed reservation (409 Conflict)
    #[error("Cannot release reservation: {0}")]
    CannotRelease(String),

    /// Internal server error (500 Internal Server Error)
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    /// Database error (500 Internal Server Error)
    #[error("Database error")]
    Database(String),
}

impl PlannerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::InvalidInput(_) | PlannerError::ValidationErrors(_) => {
                StatusCode::BAD_REQUEST
            }
            PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::NoSeats(_) | PlannerError::Expired | PlannerError::CannotRelease(_) => {
                StatusCode::CONFLICT
            }
            PlannerError::Internal(_) | PlannerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable wire name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::InvalidInput(_) | PlannerError::ValidationErrors(_) => "invalid_input",
            PlannerError::NotFound(_) => "not_found",
            PlannerError::NoSeats(_) => "no_seats",
            PlannerError::Expired => "expired",
            PlannerError::CannotRelease(_) => "cannot_release",
            PlannerError::Internal(_) => "internal",
            PlannerError::Database(_) => "database",
        }
    }

    /// Collapse validator output into one request-level error with sorted,
    /// per-field messages.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |err| match &err.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: failed the {} rule", err.code),
                })
            })
            .collect();
        messages.sort();

        if messages.is_empty() {
            PlannerError::InvalidInput("request failed validation".to_string())
        } else {
            PlannerError::ValidationErrors(messages)
        }
    }
}

/// Response mapping for the HTTP boundary.
impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "planner request failed");
        }

        let details = match &self {
            PlannerError::ValidationErrors(messages) => Some(messages.clone()),
            _ => None,
        };
        let body = ErrorBody {
            kind: self.kind(),
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for PlannerError {
    fn from(err: sqlx::Error) -> Self {
        PlannerError::Database(err.to_string())
    }
}
