//! Bearer token extractor.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use pasar_core::BearerToken;

/// Extractor for an optional `Authorization: Bearer <token>` header.
///
/// Never rejects: a missing, malformed or blank header yields `None`, and the
/// handler decides whether that is an error.
///
/// ```rust,ignore
/// async fn handler(BearerAuth(token): BearerAuth) -> impl IntoResponse {
///     match token {
///         Some(_) => "authenticated",
///         None => "anonymous",
///     }
/// }
/// ```
pub struct BearerAuth(pub Option<BearerToken>);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer);
        Ok(Self(token))
    }
}

/// Parse a `Bearer <token>` header value. The scheme is case-insensitive.
fn parse_bearer(value: &str) -> Option<BearerToken> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    BearerToken::non_empty(token)
}
