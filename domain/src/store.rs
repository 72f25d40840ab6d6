//! Persistent consumer credentials and per-user tokens.

use async_trait::async_trait;
use dashmap::DashMap;
use oauth_engine::oauth::token::Token;
use oauth_engine::oauth::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Client credentials of one provider.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsumerRecord {
    pub key: String,
    pub secret: String,
    pub domain: String,
}

impl ConsumerRecord {
    pub fn new(key: impl Into<String>, secret: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            domain: domain.unwrap_or_default(),
        }
    }

    /// Returns true when both key and secret are filled.
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }

    /// Provider configuration carrying these credentials.
    pub fn to_config(&self, redirect_uri: &str) -> ProviderConfig {
        let mut config =
            ProviderConfig::new(self.key.clone(), self.secret.clone()).with_redirect_uri(redirect_uri);
        if !self.domain.is_empty() {
            config = config.with_domain(self.domain.clone());
        }
        config
    }
}

impl fmt::Debug for ConsumerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerRecord")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Token held for one user of one provider. The default record means "not connected".
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: i64,
    pub scope: Vec<String>,
}

impl UserRecord {
    pub fn is_connected(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl From<&Token> for UserRecord {
    fn from(token: &Token) -> Self {
        Self {
            access_token: token.access_token().to_string(),
            refresh_token: token.refresh_token().unwrap_or_default().to_string(),
            expires: token.expires(),
            scope: token.scope().to_vec(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("connected", &self.is_connected())
            .field("has_refresh_token", &!self.refresh_token.is_empty())
            .field("expires", &self.expires)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Key-value store for consumer credentials and user tokens.
///
/// Missing entries read as default records.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_consumer(&self, provider: &str) -> Result<ConsumerRecord, Error>;

    async fn set_consumer(&self, provider: &str, record: ConsumerRecord) -> Result<(), Error>;

    async fn get_user(&self, provider: &str, user: &str) -> Result<UserRecord, Error>;

    /// Store a user's token, a default record clears it.
    async fn set_user(&self, provider: &str, user: &str, record: UserRecord) -> Result<(), Error>;
}

/// In-process [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    consumers: DashMap<String, ConsumerRecord>,
    users: DashMap<(String, String), UserRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_consumer(&self, provider: &str) -> Result<ConsumerRecord, Error> {
        Ok(self
            .consumers
            .get(provider)
            .map(|record| record.value().clone())
            .unwrap_or_default())
    }

    async fn set_consumer(&self, provider: &str, record: ConsumerRecord) -> Result<(), Error> {
        self.consumers.insert(provider.to_string(), record);
        Ok(())
    }

    async fn get_user(&self, provider: &str, user: &str) -> Result<UserRecord, Error> {
        Ok(self
            .users
            .get(&(provider.to_string(), user.to_string()))
            .map(|record| record.value().clone())
            .unwrap_or_default())
    }

    async fn set_user(&self, provider: &str, user: &str, record: UserRecord) -> Result<(), Error> {
        let key = (provider.to_string(), user.to_string());
        if record == UserRecord::default() {
            self.users.remove(&key);
        } else {
            self.users.insert(key, record);
        }
        Ok(())
    }
}
