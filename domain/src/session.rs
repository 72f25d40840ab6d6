//! Per-session flow data: pending CSRF states and the post-flow redirect.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;

use crate::error::{session_error, Error};

/// Session storage used while an authorization flow is in progress.
///
/// Pending states map a nonce to the provider id it was issued for.
#[async_trait]
pub trait FlowSession: Send + Sync {
    /// Provider id the nonce was issued for, empty when unknown.
    async fn get_state(&self, nonce: &str) -> Result<String, Error>;

    async fn set_state(&self, provider: &str, nonce: &str) -> Result<(), Error>;

    /// Forget the pending state of one provider.
    async fn del_state(&self, provider: &str) -> Result<(), Error>;

    /// Forget every pending state.
    async fn del_states(&self) -> Result<(), Error>;

    async fn get_redir(&self) -> Result<Option<String>, Error>;

    async fn set_redir(&self, url: &str) -> Result<(), Error>;

    async fn del_redir(&self) -> Result<(), Error>;
}

/// In-process [`FlowSession`], one per user agent.
#[derive(Debug, Default)]
pub struct MemorySession {
    states: DashMap<String, String>,
    redir: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_redir<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> Result<T, Error> {
        let mut redir = self
            .redir
            .lock()
            .map_err(|_| session_error("session lock poisoned"))?;
        Ok(f(&mut redir))
    }
}

#[async_trait]
impl FlowSession for MemorySession {
    async fn get_state(&self, nonce: &str) -> Result<String, Error> {
        Ok(self
            .states
            .get(nonce)
            .map(|provider| provider.value().clone())
            .unwrap_or_default())
    }

    async fn set_state(&self, provider: &str, nonce: &str) -> Result<(), Error> {
        self.states.insert(nonce.to_string(), provider.to_string());
        Ok(())
    }

    async fn del_state(&self, provider: &str) -> Result<(), Error> {
        self.states.retain(|_, id| id != provider);
        Ok(())
    }

    async fn del_states(&self) -> Result<(), Error> {
        self.states.clear();
        Ok(())
    }

    async fn get_redir(&self) -> Result<Option<String>, Error> {
        self.with_redir(|redir| redir.clone())
    }

    async fn set_redir(&self, url: &str) -> Result<(), Error> {
        self.with_redir(|redir| *redir = Some(url.to_string()))
    }

    async fn del_redir(&self) -> Result<(), Error> {
        self.with_redir(|redir| *redir = None)
    }
}
