//! Bearer credential issued by the backend at login.

use secrecy::{ExposeSecret, SecretString};

/// Opaque bearer token identifying the shopper's session to the backend.
///
/// `Debug` output is redacted. The raw value is only reachable through
/// [`BearerToken::expose`], which callers use when building the
/// `Authorization` header or persisting the token.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token string, trimming surrounding whitespace.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self(SecretString::from(token.trim()))
    }

    /// Wrap a raw token string, returning `None` if it is blank.
    #[must_use]
    pub fn non_empty(token: &str) -> Option<Self> {
        let token = Self::new(token);
        (!token.is_empty()).then_some(token)
    }

    /// Whether the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// The raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// The `Authorization` header value for this token.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl From<SecretString> for BearerToken {
    fn from(secret: SecretString) -> Self {
        Self::new(secret.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = BearerToken::new("tok_live_123");
        let debug = format!("{token:?}");
        assert!(!debug.contains("tok_live_123"));
    }

    #[test]
    fn test_non_empty() {
        assert!(BearerToken::non_empty("").is_none());
        assert!(BearerToken::non_empty("   ").is_none());
        assert!(BearerToken::non_empty("abc").is_some());
    }

    #[test]
    fn test_authorization_value() {
        let token = BearerToken::new(" abc \n");
        assert_eq!(token.authorization_value(), "Bearer abc");
    }
}
