// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::AuthStatus;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Session required")]
    Unauthorized,

    #[error("LinkedIn account is not connected")]
    NotConnected,

    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: AuthStatus,
        action: &'static str,
    },

    #[error("Authorization initiation failed: {0}")]
    AuthInitiation(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Invalid reach data: {0}")]
    InvalidReachData(String),

    #[error("Invalid connection data: {0}")]
    InvalidConnectionData(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Profile storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, also used as the `?error=` value on redirects.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::NotConnected => "not_connected",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::AuthInitiation(_) => "auth_initiation_failed",
            AppError::AuthExchange(_) => "auth_exchange_failed",
            AppError::InvalidReachData(_) => "invalid_reach_data",
            AppError::InvalidConnectionData(_) => "invalid_connection_data",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether this error came from the auth provider round trip.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, AppError::AuthInitiation(_) | AppError::AuthExchange(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, None),
            AppError::NotConnected => (StatusCode::CONFLICT, None),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, Some(self.to_string())),
            AppError::AuthInitiation(msg) | AppError::AuthExchange(msg) => {
                tracing::warn!(error = %msg, code = self.code(), "Auth provider error");
                (StatusCode::BAD_GATEWAY, Some(msg.clone()))
            }
            AppError::InvalidReachData(msg) | AppError::InvalidConnectionData(msg) => {
                tracing::error!(error = %msg, code = self.code(), "Malformed network data");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg.clone())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Profile storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
