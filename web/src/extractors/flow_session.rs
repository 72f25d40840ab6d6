//! `FlowSession` backed by the tower-sessions cookie session.

use async_trait::async_trait;
use domain::error::{session_error, Error as DomainError};
use domain::{FlowSession, Notice};
use std::collections::HashMap;
use tower_sessions::Session;

const STATES_KEY: &str = "oauth2.states";
const REDIR_KEY: &str = "oauth2.redir";
const NOTICE_KEY: &str = "oauth2.notice";
const USER_KEY: &str = "oauth2.user";

/// Wraps the request's session for the duration of one flow step.
#[derive(Clone, Debug)]
pub struct SessionFlow {
    session: Session,
}

impl SessionFlow {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Id of the session's user, created on first visit.
    pub async fn user_id(&self) -> Result<String, tower_sessions::session::Error> {
        if let Some(user) = self.session.get::<String>(USER_KEY).await? {
            return Ok(user);
        }

        let user = hex::encode(rand::random::<[u8; 16]>());
        self.session.insert(USER_KEY, &user).await?;
        Ok(user)
    }

    /// Keep a notice until the next listing.
    pub async fn set_notice(&self, notice: &Notice) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(NOTICE_KEY, notice).await
    }

    /// Take the pending notice, if any.
    pub async fn take_notice(&self) -> Result<Option<Notice>, tower_sessions::session::Error> {
        self.session.remove::<Notice>(NOTICE_KEY).await
    }

    async fn states(&self) -> Result<HashMap<String, String>, DomainError> {
        Ok(self
            .session
            .get::<HashMap<String, String>>(STATES_KEY)
            .await
            .map_err(failed)?
            .unwrap_or_default())
    }

    async fn save_states(&self, states: HashMap<String, String>) -> Result<(), DomainError> {
        self.session
            .insert(STATES_KEY, states)
            .await
            .map_err(failed)
    }
}

fn failed(err: tower_sessions::session::Error) -> DomainError {
    session_error(&err.to_string())
}

#[async_trait]
impl FlowSession for SessionFlow {
    async fn get_state(&self, nonce: &str) -> Result<String, DomainError> {
        Ok(self.states().await?.remove(nonce).unwrap_or_default())
    }

    async fn set_state(&self, provider: &str, nonce: &str) -> Result<(), DomainError> {
        let mut states = self.states().await?;
        states.insert(nonce.to_string(), provider.to_string());
        self.save_states(states).await
    }

    async fn del_state(&self, provider: &str) -> Result<(), DomainError> {
        let mut states = self.states().await?;
        states.retain(|_, id| id != provider);
        self.save_states(states).await
    }

    async fn del_states(&self) -> Result<(), DomainError> {
        self.session
            .remove::<HashMap<String, String>>(STATES_KEY)
            .await
            .map_err(failed)?;
        Ok(())
    }

    async fn get_redir(&self) -> Result<Option<String>, DomainError> {
        self.session.get::<String>(REDIR_KEY).await.map_err(failed)
    }

    async fn set_redir(&self, url: &str) -> Result<(), DomainError> {
        self.session.insert(REDIR_KEY, url).await.map_err(failed)
    }

    async fn del_redir(&self) -> Result<(), DomainError> {
        self.session
            .remove::<String>(REDIR_KEY)
            .await
            .map_err(failed)?;
        Ok(())
    }
}
