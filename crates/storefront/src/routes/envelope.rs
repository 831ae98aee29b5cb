//! `{success, message, data}` error responses for the account routes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::warn;

use crate::backend::{ApiEnvelope, BackendError};

/// A failed envelope with an HTTP status.
#[derive(Debug)]
pub struct EnvelopeError {
    status: StatusCode,
    message: String,
}

impl EnvelopeError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Relay a backend failure: keep its status and message when the backend
    /// answered, otherwise 500 with `fallback`.
    #[must_use]
    pub fn from_backend(err: &BackendError, fallback: &str) -> Self {
        let status = err
            .status()
            .and_then(|status| StatusCode::from_u16(status).ok())
            .filter(|status| status.is_client_error() || status.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match err {
            BackendError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        };

        if status.is_server_error() {
            let event_id = sentry::capture_error(err);
            warn!(error = %err, sentry_event_id = %event_id, "Backend call failed");
        } else {
            warn!(error = %err, status = %status, "Backend rejected request");
        }

        Self { status, message }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiEnvelope::<Value>::failure(self.message)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_is_relayed() {
        let err = BackendError::Api {
            status: 409,
            message: "Email already registered".to_string(),
        };
        let envelope = EnvelopeError::from_backend(&err, "Registration failed");
        assert_eq!(envelope.status(), StatusCode::CONFLICT);
        assert_eq!(envelope.message, "Email already registered");
    }

    #[test]
    fn test_transport_failure_is_500_with_fallback() {
        let err = BackendError::InvalidRequest("bad upload".to_string());
        let envelope = EnvelopeError::from_backend(&err, "Registration failed");
        assert_eq!(envelope.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.message, "Registration failed");
    }
}
