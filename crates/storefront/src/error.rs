//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::MailError;

/// Message returned when the order email could not be sent.
pub const ORDER_FAILED_MESSAGE: &str = "Order failed to send";

/// Message returned for non-POST requests to the order endpoint.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST requests allowed";

/// JSON body carried by every API response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order email failed at any step.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Wrong HTTP method on an API route.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Mail(_)) {
            report(&self);
        }

        let status = match &self {
            Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Mail(_) => ORDER_FAILED_MESSAGE,
            Self::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE,
            Self::NotFound(_) => "Not found",
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Log an error and capture it to Sentry.
pub fn report(error: &(dyn std::error::Error + 'static)) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "Request error"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
