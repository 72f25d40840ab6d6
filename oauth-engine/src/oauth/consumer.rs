//! Application client credentials for one provider.

use secrecy::{ExposeSecret, SecretString};

/// An application's client id/secret, and the optional custom domain some providers require.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Consumer {
    key: String,
    secret: SecretString,
    domain: String,
}

impl Consumer {
    /// Create a consumer.
    ///
    /// # Arguments
    ///
    /// * `key` - Client id issued by the provider
    /// * `secret` - Client secret issued by the provider
    /// * `domain` - Base URL for providers hosted on a per-tenant domain
    pub fn new(key: impl Into<String>, secret: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::new(secret.into()),
            domain: domain
                .map(|d| d.trim().trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Returns true when both key and secret are filled.
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && !self.secret.expose_secret().is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Custom domain without trailing slash, empty when not set.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
