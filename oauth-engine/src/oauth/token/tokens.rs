//! OAuth token type.

use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{token_error, Error, TokenErrorKind};

/// Access token with metadata, as granted by a provider.
///
/// A `Token` always carries a non-empty access token and is never mutated after parsing.
#[derive(Debug, Clone)]
pub struct Token {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires: i64,
    scope: Vec<String>,
}

impl Token {
    /// Create a token.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Access token, must not be empty
    /// * `refresh_token` - Refresh token, an empty string counts as absent
    /// * `expires` - Absolute unix timestamp of expiry, `0` for never
    /// * `scope` - Granted scopes, duplicates and empty entries are dropped
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires: i64,
        scope: Vec<String>,
    ) -> Result<Self, Error> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(token_error(
                TokenErrorKind::MissingAccessToken,
                "Invalid access token",
            ));
        }

        let mut unique: Vec<String> = Vec::with_capacity(scope.len());
        for item in scope {
            if !item.is_empty() && !unique.contains(&item) {
                unique.push(item);
            }
        }

        Ok(Self {
            access_token: SecretString::new(access_token),
            refresh_token: refresh_token
                .filter(|token| !token.is_empty())
                .map(SecretString::new),
            expires,
            scope: unique,
        })
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }

    /// Unix timestamp of expiry, `0` when the token never expires.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// Expiry as a date, `None` when the token never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires == 0 {
            None
        } else {
            Utc.timestamp_opt(self.expires, 0).single()
        }
    }

    /// Check if the access token is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub(crate) fn is_expired_at(&self, now: i64) -> bool {
        self.expires != 0 && self.expires < now
    }

    /// Granted scopes.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_requires_access_token() {
        let err = Token::new("", Some("refresh".into()), 0, vec![]).unwrap_err();
        assert_eq!(
            err.error_kind,
            crate::error::ErrorKind::Token(TokenErrorKind::MissingAccessToken)
        );
    }

    #[test]
    fn test_token_never_expires() {
        let token = Token::new("access", None, 0, vec![]).unwrap();
        assert!(!token.is_expired());
        assert!(!token.is_expired_at(i64::MAX));
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_token_not_expired() {
        let expires = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        let token = Token::new("access", None, expires, vec![]).unwrap();
        assert!(!token.is_expired());
        assert_eq!(token.expires_at().map(|d| d.timestamp()), Some(expires));
    }

    #[test]
    fn test_token_expired() {
        let expires = (Utc::now() - chrono::Duration::hours(1)).timestamp();
        let token = Token::new("access", None, expires, vec![]).unwrap();
        assert!(token.is_expired());
    }

    #[test]
    fn test_empty_refresh_token_is_absent() {
        let token = Token::new("access", Some(String::new()), 0, vec![]).unwrap();
        assert!(token.refresh_token().is_none());
    }

    #[test]
    fn test_scope_is_deduplicated_in_order() {
        let token = Token::new(
            "access",
            None,
            0,
            vec!["b".into(), "a".into(), "b".into(), "".into()],
        )
        .unwrap();
        assert_eq!(token.scope(), &["b".to_string(), "a".to_string()]);
        assert!(token.has_scope("a"));
        assert!(!token.has_scope("c"));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token = Token::new("very-secret", Some("also-secret".into()), 0, vec![]).unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("also-secret"));
    }
}
