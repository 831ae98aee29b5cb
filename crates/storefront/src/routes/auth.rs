//! Account route handlers.
//!
//! Registration and login are relayed to the backend. Responses use the
//! backend's `{success, message, data}` envelope, including failures.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State, rejection::JsonRejection},
    http::{StatusCode, header::CONTENT_TYPE},
};
use pasar_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::envelope::EnvelopeError;
use super::multipart::FormFields;
use crate::backend::{ApiEnvelope, Credentials, LoginData, Registration, Upload, UserProfile};
use crate::state::AppState;

const REGISTER_MISSING_FIELDS: &str =
    "Missing required fields: name, email, and password are required";
const LOGIN_MISSING_FIELDS: &str = "Missing required fields: email and password are required";

// =============================================================================
// Request Types
// =============================================================================

/// JSON registration body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RegisterRequest {
    fn from_form(form: &FormFields) -> Self {
        Self {
            name: form.text("name").unwrap_or_default().to_owned(),
            email: form.text("email").unwrap_or_default().to_owned(),
            password: form.text("password").unwrap_or_default().to_owned(),
            avatar_url: form.text("avatarUrl").map(str::to_owned),
        }
    }

    fn into_registration(self, avatar: Option<Upload>) -> Result<Registration, EnvelopeError> {
        let name = self.name.trim();
        if name.is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(EnvelopeError::new(
                StatusCode::BAD_REQUEST,
                REGISTER_MISSING_FIELDS,
            ));
        }
        let email = Email::parse(&self.email)
            .map_err(|e| EnvelopeError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

        Ok(Registration {
            name: name.to_owned(),
            email,
            password: SecretString::from(self.password),
            avatar_url: self.avatar_url.filter(|url| !url.trim().is_empty()),
            avatar,
        })
    }
}

/// JSON login body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a shopper.
///
/// Accepts `application/json` or `multipart/form-data` (with an optional
/// `avatar` file). Anything else is 415.
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ApiEnvelope<UserProfile>>, EnvelopeError> {
    let registration = read_registration(&state, request).await?;

    let envelope = state
        .backend()
        .register_user(&registration)
        .await
        .map_err(|e| EnvelopeError::from_backend(&e, "Registration failed"))?;

    info!(email = %registration.email, success = envelope.success, "Registration relayed");
    Ok(Json(envelope))
}

/// `GET /api/register` is not supported.
pub async fn register_not_allowed() -> EnvelopeError {
    EnvelopeError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method GET not allowed for this endpoint",
    )
}

/// Log in and relay the issued token.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiEnvelope<LoginData>>, EnvelopeError> {
    let Json(request) = payload
        .map_err(|rejection| EnvelopeError::new(rejection.status(), rejection.body_text()))?;

    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(EnvelopeError::new(
            StatusCode::BAD_REQUEST,
            LOGIN_MISSING_FIELDS,
        ));
    }
    let email = Email::parse(&request.email)
        .map_err(|e| EnvelopeError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let credentials = Credentials {
        email,
        password: SecretString::from(request.password),
    };

    let envelope = state
        .backend()
        .login(&credentials)
        .await
        .map_err(|e| EnvelopeError::from_backend(&e, "Login failed"))?;

    info!(email = %credentials.email, success = envelope.success, "Login relayed");
    Ok(Json(envelope))
}

// =============================================================================
// Helpers
// =============================================================================

async fn read_registration(
    state: &AppState,
    request: Request,
) -> Result<Registration, EnvelopeError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    debug!(content_type = %content_type, "Reading registration");

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| EnvelopeError::new(rejection.status(), rejection.body_text()))?;
        let mut form = FormFields::read(multipart)
            .await
            .map_err(|e| EnvelopeError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
        let avatar = form.take_file("avatar");
        RegisterRequest::from_form(&form).into_registration(avatar)
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<RegisterRequest>::from_request(request, state)
            .await
            .map_err(|rejection| EnvelopeError::new(rejection.status(), rejection.body_text()))?;
        body.into_registration(None)
    } else {
        Err(EnvelopeError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported Content-Type: {content_type}"),
        ))
    }
}
