//! Request and response types for the backend API.
//!
//! Cart payloads have their own validated DTOs in
//! [`conversions`](super::conversions); product payloads are opaque JSON.

use std::fmt;

use pasar_core::{BearerToken, Email, ProductId, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Response envelope used by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// A failed envelope with no data.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// A registered shopper as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Payload of a successful login.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl LoginData {
    /// The issued token, if it is not blank.
    #[must_use]
    pub fn bearer_token(&self) -> Option<BearerToken> {
        BearerToken::non_empty(&self.token)
    }
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// A file attached to a multipart request.
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Shopper sign-up details.
///
/// Sent as JSON, or as multipart when an avatar file is attached.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
    pub avatar_url: Option<String>,
    pub avatar: Option<Upload>,
}

/// JSON body for registration without an avatar file.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
}

impl<'a> From<&'a Registration> for RegistrationBody<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            name: &registration.name,
            email: registration.email.as_str(),
            password: registration.password.expose_secret(),
            avatar_url: registration.avatar_url.as_deref(),
        }
    }
}

/// Login details.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

#[derive(Serialize)]
pub(crate) struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for CredentialsBody<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        }
    }
}

/// Seller onboarding details.
#[derive(Debug, Clone)]
pub struct ShopRegistration {
    pub name: String,
    pub slug: String,
    pub address: String,
    pub logo: Option<Upload>,
}

/// JSON body for adding a product to the remote cart.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartItemBody<'a> {
    pub product_id: &'a ProductId,
    pub qty: u32,
}
