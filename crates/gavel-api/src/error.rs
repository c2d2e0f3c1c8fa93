// SPDX-License-Identifier: BUSL-1.1
//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from gavel-core and gavel-model-client to HTTP
//! status codes and returns JSON error bodies with error code, message,
//! and details.
//!
//! Extraction and upstream failures intentionally DO carry their
//! diagnostic context (decoder message, raw-text snippet, offending
//! field) in the response: the caller must be able to reproduce the parse
//! state from the error alone. Only `Internal` messages are masked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gavel_core::{ExtractionError, RegistryError};
use gavel_model_client::BackendError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "MALFORMED_OUTPUT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional diagnostic context, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Service dependency not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// The generative backend call failed (502).
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Backend output could not be turned into a valid decision (502).
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Registry write-once invariant violated (500).
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl AppError {
    /// HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Backend(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Extraction(ExtractionError::MalformedOutput { .. }) => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_OUTPUT")
            }
            Self::Extraction(ExtractionError::InvalidRecord { .. }) => {
                (StatusCode::BAD_GATEWAY, "INVALID_RECORD")
            }
            Self::Registry(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REGISTRY_CONFLICT"),
        }
    }

    /// Diagnostic details carried in the response body.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Extraction(ExtractionError::MalformedOutput { message, snippet }) => {
                Some(serde_json::json!({ "parser_message": message, "raw_snippet": snippet }))
            }
            Self::Extraction(ExtractionError::InvalidRecord { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) | Self::Registry(_) => {
                tracing::error!(error = %self, "internal server error");
            }
            Self::Backend(_) => tracing::error!(error = %self, "backend call failed"),
            Self::Extraction(_) => tracing::warn!(error = %self, "extraction failed"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}
