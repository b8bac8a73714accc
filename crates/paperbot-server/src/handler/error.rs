//! HTTP error responses.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Result type for HTTP handlers.
pub type Result<T, E = ErrorResponse> = std::result::Result<T, E>;

/// HTTP error response representation.
///
/// Contains the error name, a user-friendly message safe for client display,
/// the HTTP status code, and optional internal context for debugging.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// The error name/type identifier
    pub name: Cow<'static, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'static, str>,
    /// Internal context for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'static, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self = Self::new(
        "conflict",
        "The request conflicts with the current state of the resource",
        StatusCode::CONFLICT,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'static str, message: &'static str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            context: None,
            status,
        }
    }

    /// Replaces the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<paperbot_postgres::PgError> for ErrorResponse {
    fn from(err: paperbot_postgres::PgError) -> Self {
        if err.is_not_found() {
            Self::NOT_FOUND
        } else {
            Self::INTERNAL_SERVER_ERROR.with_context(err.to_string())
        }
    }
}

impl From<PipelineError> for ErrorResponse {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::NotFound => Self::NOT_FOUND.with_message(err.to_string()),
            PipelineError::AlreadyProcessed => Self::CONFLICT.with_message(err.to_string()),
            PipelineError::Validation(_) | PipelineError::NoContext => {
                Self::BAD_REQUEST.with_message(err.to_string())
            }
            PipelineError::Extraction(_) => Self::BAD_REQUEST.with_message(err.to_string()),
            _ => Self::INTERNAL_SERVER_ERROR.with_context(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_context_maps_to_exact_message() {
        let response = ErrorResponse::from(PipelineError::NoContext);
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.message,
            "No relevant context found in the provided files."
        );
    }

    #[test]
    fn context_merging() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("database connection failed")
            .with_context("during delete");

        assert_eq!(
            response.context.as_deref(),
            Some("database connection failed; during delete")
        );
    }

    #[test]
    fn status_is_not_serialized() {
        let json = serde_json::to_string(&ErrorResponse::BAD_REQUEST).unwrap();
        assert!(json.contains("name"));
        assert!(json.contains("message"));
        assert!(!json.contains("status"));
    }
}
