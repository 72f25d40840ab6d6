//! Request dispatch for the query-driven OAuth endpoint.
//!
//! One endpoint serves every step of the flow: starting an authorization, receiving the
//! provider callback, refreshing and revoking a stored token.

use log::*;
use oauth_engine::http::HttpTransport;
use oauth_engine::oauth::{AuthorizationResponse, Provider};
use oauth_engine::Services;
use serde::{Deserialize, Serialize};
use service::config::Config;
use service::consumers::ConsumerCredentials;
use std::sync::Arc;

use crate::error::{config_error, flow_error, ConfigErrorKind, Error, FlowErrorKind};
use crate::session::FlowSession;
use crate::store::{ConsumerRecord, Store, UserRecord};

/// Query parameter appended to the redirect after a failure.
pub const ERROR_MARKER: &str = "oauth2error";

/// Query parameters understood by [`OAuthManager::request_action`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionRequest {
    /// Provider id to start an authorization with.
    pub authorize: Option<String>,
    /// Nonce echoed by the provider on callback.
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
    /// Provider id whose stored token is refreshed.
    pub refresh: Option<String>,
    /// Provider id whose stored token is cleared.
    pub revoke: Option<String>,
    /// Where to send the user agent once the flow is over.
    pub redir: Option<String>,
    pub oauth2error: Option<String>,
}

impl ActionRequest {
    fn authorization_response(&self) -> AuthorizationResponse {
        AuthorizationResponse {
            code: self.code.clone(),
            state: self.state.clone(),
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Message shown to the user after a flow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of dispatching one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Send the user agent to `url`.
    Redirect { url: String, notice: Option<Notice> },
    /// Nothing to do: no action parameter, or an unknown or disabled provider.
    Ignored,
    /// The step failed. `redirect` is `None` when the request already carried the error
    /// marker, so a failing redirect target cannot loop.
    Failed {
        notice: Notice,
        redirect: Option<String>,
    },
}

/// Provider listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub console_url: String,
    pub protocol: String,
    pub requires_domain: bool,
    pub enabled: bool,
    pub connected: bool,
    pub action_link: Option<String>,
}

/// Runs the authorization flows of every registered provider for the users of one site.
#[derive(Clone)]
pub struct OAuthManager {
    services: Services,
    store: Arc<dyn Store>,
    redirect_uri: String,
}

impl OAuthManager {
    /// Create a manager.
    ///
    /// When the redirect URI is not served over https, or points at localhost, every
    /// provider is disabled unless `allow_insecure_redirect_uri` is set.
    pub fn new(
        mut services: Services,
        store: Arc<dyn Store>,
        redirect_uri: impl Into<String>,
        allow_insecure_redirect_uri: bool,
    ) -> Self {
        let redirect_uri = redirect_uri.into();

        if !is_secure_redirect_uri(&redirect_uri) {
            if allow_insecure_redirect_uri {
                warn!("Redirect URI {} is not secure, providers stay enabled", redirect_uri);
            } else {
                warn!(
                    "Redirect URI {} must use https and not localhost, disabling all providers",
                    redirect_uri
                );
                services.disable_all();
            }
        }

        Self {
            services,
            store,
            redirect_uri,
        }
    }

    /// Build a manager with the built-in providers and an HTTP transport.
    pub fn from_config(config: &Config, store: Arc<dyn Store>) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new()?);
        let services = Services::new(config.disabled_providers(), transport);

        Ok(Self::new(
            services,
            store,
            config.redirect_uri(),
            config.allow_insecure_redirect_uri,
        ))
    }

    /// Store consumer credentials loaded at start-up.
    pub async fn seed_consumers(
        &self,
        consumers: impl IntoIterator<Item = (String, ConsumerCredentials)>,
    ) -> Result<usize, Error> {
        let mut count = 0;
        for (provider, credentials) in consumers {
            if !self.services.has_provider(&provider) {
                warn!("Ignoring credentials of unknown provider {}", provider);
                continue;
            }

            let record =
                ConsumerRecord::new(credentials.key, credentials.secret, credentials.domain);
            self.store.set_consumer(&provider, record).await?;
            count += 1;
        }
        Ok(count)
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns true when the redirect URI uses https and is not on localhost.
    pub fn check_redirect_uri(&self) -> bool {
        is_secure_redirect_uri(&self.redirect_uri)
    }

    /// Returns true when the provider is registered and enabled.
    pub fn check_provider(&self, provider: &str) -> bool {
        !provider.is_empty()
            && self.services.has_provider(provider)
            && !self.services.is_disabled(provider)
    }

    /// Dispatch one request.
    ///
    /// Parameters are inspected in order: `authorize`, `state`, `refresh`, `revoke`.
    /// Flow failures are reported as [`Outcome::Failed`]; `Err` is only returned when the
    /// session itself cannot be read.
    pub async fn request_action(
        &self,
        request: &ActionRequest,
        session: &dyn FlowSession,
        user: &str,
    ) -> Result<Outcome, Error> {
        let result = if let Some(provider) = non_empty(&request.authorize) {
            self.request_authorization_code(provider, request, session)
                .await
        } else if let Some(state) = non_empty(&request.state) {
            self.request_access_token(state, request, session, user)
                .await
        } else if let Some(provider) = non_empty(&request.refresh) {
            self.refresh_access_token(provider, request, session, user)
                .await
        } else if let Some(provider) = non_empty(&request.revoke) {
            self.revoke_access_token(provider, request, session, user)
                .await
        } else {
            Ok(Outcome::Ignored)
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(err) => self.fail(err, request, session).await,
        }
    }

    async fn fail(
        &self,
        err: Error,
        request: &ActionRequest,
        session: &dyn FlowSession,
    ) -> Result<Outcome, Error> {
        let notice = Notice::error(err.message());

        if non_empty(&request.oauth2error).is_some() {
            error!("OAuth request failed again after an error redirect: {}", err);
            return Ok(Outcome::Failed {
                notice,
                redirect: None,
            });
        }

        warn!("OAuth request failed: {}", err);
        let redir = self.stored_redir(session).await?;
        let separator = if redir.contains('?') { '&' } else { '?' };

        Ok(Outcome::Failed {
            notice,
            redirect: Some(format!("{}{}{}=1", redir, separator, ERROR_MARKER)),
        })
    }

    async fn request_authorization_code(
        &self,
        id: &str,
        request: &ActionRequest,
        session: &dyn FlowSession,
    ) -> Result<Outcome, Error> {
        if !self.check_provider(id) {
            debug!("Ignoring authorization request for {}", id);
            return Ok(Outcome::Ignored);
        }

        let consumer = self.store.get_consumer(id).await?;
        if !consumer.is_configured() {
            return Err(config_error(
                ConfigErrorKind::ConsumerNotConfigured,
                &format!("Consumer of {} is not configured", id),
            ));
        }

        session.del_states().await?;
        let provider = self.provider(id, &consumer, None)?;
        session.set_state(id, provider.state()).await?;
        session.set_redir(self.redir_or_default(request)).await?;

        info!("Starting authorization with {}", id);
        Ok(Outcome::Redirect {
            url: provider.authorize_url(),
            notice: None,
        })
    }

    async fn request_access_token(
        &self,
        state: &str,
        request: &ActionRequest,
        session: &dyn FlowSession,
        user: &str,
    ) -> Result<Outcome, Error> {
        let id = session.get_state(state).await?;
        if !self.check_provider(&id) {
            warn!("Ignoring callback with an unknown state");
            return Ok(Outcome::Ignored);
        }

        let consumer = self.store.get_consumer(&id).await?;
        let provider = self.provider(&id, &consumer, Some(state))?;
        let token = provider
            .request_access_token(&request.authorization_response())
            .await?;

        self.store
            .set_user(&id, user, UserRecord::from(&token))
            .await?;
        session.del_states().await?;

        info!("Connected {} for user {}", id, user);
        Ok(Outcome::Redirect {
            url: self.stored_redir(session).await?,
            notice: Some(Notice::success("Service successfully connected")),
        })
    }

    async fn refresh_access_token(
        &self,
        id: &str,
        request: &ActionRequest,
        session: &dyn FlowSession,
        user: &str,
    ) -> Result<Outcome, Error> {
        if !self.check_provider(id) {
            return Ok(Outcome::Ignored);
        }

        session.set_redir(self.redir_or_default(request)).await?;

        let current = self.store.get_user(id, user).await?;
        if current.refresh_token.is_empty() {
            return Err(flow_error(
                FlowErrorKind::MissingRefreshToken,
                &format!("No refresh token stored for {}", id),
            ));
        }

        let consumer = self.store.get_consumer(id).await?;
        let provider = self.provider(id, &consumer, None)?;
        let token = provider.request_refresh_token(&current.refresh_token).await?;

        let mut record = UserRecord::from(&token);
        if record.refresh_token.is_empty() {
            record.refresh_token = current.refresh_token;
        }
        self.store.set_user(id, user, record).await?;

        info!("Refreshed {} token for user {}", id, user);
        Ok(Outcome::Redirect {
            url: self.stored_redir(session).await?,
            notice: Some(Notice::success("Service successfully refreshed")),
        })
    }

    async fn revoke_access_token(
        &self,
        id: &str,
        request: &ActionRequest,
        session: &dyn FlowSession,
        user: &str,
    ) -> Result<Outcome, Error> {
        if !self.check_provider(id) {
            return Ok(Outcome::Ignored);
        }

        self.store.set_user(id, user, UserRecord::default()).await?;
        session.del_states().await?;
        session.set_redir(self.redir_or_default(request)).await?;

        info!("Disconnected {} for user {}", id, user);
        Ok(Outcome::Redirect {
            url: self.stored_redir(session).await?,
            notice: Some(Notice::success("Service successfully disconnected")),
        })
    }

    /// Link that connects the user to a provider, or disconnects them when a token is stored.
    ///
    /// `None` for unknown or disabled providers, and for providers that cannot be built.
    pub async fn action_link(&self, id: &str, user: &str, redir: &str) -> Option<String> {
        if !self.check_provider(id) {
            return None;
        }

        let consumer = self.store.get_consumer(id).await.ok()?;
        self.provider(id, &consumer, None).ok()?;
        let record = self.store.get_user(id, user).await.ok()?;

        let action = if record.is_connected() {
            "revoke"
        } else {
            "authorize"
        };
        let separator = if self.redirect_uri.contains('?') { '&' } else { '?' };

        Some(format!(
            "{}{}{}={}&redir={}",
            self.redirect_uri,
            separator,
            action,
            id,
            urlencoding::encode(redir)
        ))
    }

    /// Every registered provider, with the user's connection status.
    pub async fn providers(&self, user: &str, redir: &str) -> Result<Vec<ProviderSummary>, Error> {
        let mut summaries = Vec::new();
        for (id, kind) in self.services.get_providers() {
            let connected = self.store.get_user(id, user).await?.is_connected();
            summaries.push(ProviderSummary {
                id: id.clone(),
                name: kind.name().to_string(),
                description: kind.description().to_string(),
                console_url: kind.console_url().to_string(),
                protocol: kind.protocol().to_string(),
                requires_domain: kind.requires_domain(),
                enabled: self.check_provider(id),
                connected,
                action_link: self.action_link(id, user, redir).await,
            });
        }
        Ok(summaries)
    }

    fn provider(
        &self,
        id: &str,
        consumer: &ConsumerRecord,
        state: Option<&str>,
    ) -> Result<Provider, Error> {
        let mut config = consumer.to_config(&self.redirect_uri);
        if let Some(state) = state {
            config = config.with_state(state);
        }
        Ok(self.services.get_provider(id, config)?)
    }

    fn redir_or_default<'a>(&'a self, request: &'a ActionRequest) -> &'a str {
        non_empty(&request.redir).unwrap_or(&self.redirect_uri)
    }

    async fn stored_redir(&self, session: &dyn FlowSession) -> Result<String, Error> {
        Ok(session
            .get_redir()
            .await?
            .filter(|redir| !redir.is_empty())
            .unwrap_or_else(|| self.redirect_uri.clone()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_secure_redirect_uri(redirect_uri: &str) -> bool {
    redirect_uri.contains("https://") && !redirect_uri.contains("localhost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use crate::store::MemoryStore;
    use mockito::{Matcher, Server};
    use oauth_engine::oauth::{Consumer, ProviderKind};

    const REDIRECT_URI: &str = "https://blog.example.com/oauth2";

    struct MockKind {
        base: String,
    }

    impl ProviderKind for MockKind {
        fn id(&self) -> &'static str {
            "mock"
        }
        fn name(&self) -> &'static str {
            "Mock"
        }
        fn description(&self) -> &'static str {
            "Mock provider"
        }
        fn console_url(&self) -> &'static str {
            "https://example.com/apps"
        }
        fn authorize_uri(&self, _consumer: &Consumer) -> String {
            format!("{}/authorize", self.base)
        }
        fn access_token_uri(&self, _consumer: &Consumer) -> String {
            format!("{}/token", self.base)
        }
        fn request_uri(&self, _consumer: &Consumer) -> String {
            format!("{}/api/", self.base)
        }
        fn default_scope(&self) -> &'static [&'static str] {
            &["read"]
        }
    }

    async fn manager_with(base: &str, redirect_uri: &str) -> OAuthManager {
        let transport = Arc::new(HttpTransport::new().unwrap());
        let mut services = Services::new(Vec::<String>::new(), transport);
        assert!(services.add_provider(
            "mock",
            Arc::new(MockKind {
                base: base.to_string()
            })
        ));

        let store = Arc::new(MemoryStore::new());
        store
            .set_consumer("mock", ConsumerRecord::new("client", "secret", None))
            .await
            .unwrap();

        OAuthManager::new(services, store, redirect_uri, false)
    }

    async fn manager(base: &str) -> OAuthManager {
        manager_with(base, REDIRECT_URI).await
    }

    fn authorize(provider: &str, redir: Option<&str>) -> ActionRequest {
        ActionRequest {
            authorize: Some(provider.to_string()),
            redir: redir.map(str::to_string),
            ..Default::default()
        }
    }

    fn callback(state: &str, code: &str) -> ActionRequest {
        ActionRequest {
            state: Some(state.to_string()),
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    fn query_value(url: &str, name: &str) -> Option<String> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    async fn start(manager: &OAuthManager, session: &MemorySession, redir: &str) -> String {
        let outcome = manager
            .request_action(&authorize("mock", Some(redir)), session, "u1")
            .await
            .unwrap();
        match outcome {
            Outcome::Redirect { url, notice: None } => query_value(&url, "state").unwrap(),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_action_is_ignored() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        let outcome = manager
            .request_action(&ActionRequest::default(), &session, "u1")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_authorize_redirects_to_provider() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();

        let outcome = manager
            .request_action(
                &authorize("mock", Some("https://blog.example.com/admin")),
                &session,
                "u1",
            )
            .await
            .unwrap();

        let Outcome::Redirect { url, .. } = outcome else {
            panic!("expected a redirect");
        };
        assert!(url.starts_with("https://auth.example.com/authorize?"));
        assert_eq!(query_value(&url, "client_id").as_deref(), Some("client"));
        assert_eq!(query_value(&url, "redirect_uri").as_deref(), Some(REDIRECT_URI));
        assert_eq!(query_value(&url, "scope").as_deref(), Some("read"));

        let state = query_value(&url, "state").unwrap();
        assert_eq!(session.get_state(&state).await.unwrap(), "mock");
        assert_eq!(
            session.get_redir().await.unwrap().as_deref(),
            Some("https://blog.example.com/admin")
        );
    }

    #[tokio::test]
    async fn test_authorize_clears_other_pending_states() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        session.set_state("github", "nonce-b").await.unwrap();

        let state = start(&manager, &session, "https://blog.example.com/admin").await;

        assert_eq!(session.get_state("nonce-b").await.unwrap(), "");
        assert_eq!(session.get_state(&state).await.unwrap(), "mock");
    }

    #[tokio::test]
    async fn test_authorize_unknown_provider_is_ignored() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        let outcome = manager
            .request_action(&authorize("nope", None), &session, "u1")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_authorize_without_consumer_fails() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();

        let outcome = manager
            .request_action(&authorize("github", None), &session, "u1")
            .await
            .unwrap();

        let Outcome::Failed { notice, redirect } = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(redirect.as_deref(), Some("https://blog.example.com/oauth2?oauth2error=1"));
    }

    #[tokio::test]
    async fn test_callback_stores_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "c1".into()),
                Matcher::UrlEncoded("client_id".into(), "client".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"t1","refresh_token":"r1","scope":"read"}"#)
            .create_async()
            .await;

        let manager = manager(&server.url()).await;
        let session = MemorySession::new();
        let state = start(&manager, &session, "https://blog.example.com/admin").await;

        let outcome = manager
            .request_action(&callback(&state, "c1"), &session, "u1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "https://blog.example.com/admin".to_string(),
                notice: Some(Notice::success("Service successfully connected")),
            }
        );

        let record = manager.store().get_user("mock", "u1").await.unwrap();
        assert_eq!(record.access_token, "t1");
        assert_eq!(record.refresh_token, "r1");
        assert_eq!(record.scope, vec!["read".to_string()]);
        assert_eq!(session.get_state(&state).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_callback_with_unknown_state_is_ignored() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        start(&manager, &session, "https://blog.example.com/admin").await;

        let outcome = manager
            .request_action(&callback("forged", "c1"), &session, "u1")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_callback_error_redirects_with_marker() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        let state = start(&manager, &session, "https://blog.example.com/admin?tab=1").await;

        let request = ActionRequest {
            state: Some(state),
            error: Some("access_denied".to_string()),
            ..Default::default()
        };
        let outcome = manager.request_action(&request, &session, "u1").await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Failed {
                notice: Notice::error("Unauthorized: access_denied"),
                redirect: Some("https://blog.example.com/admin?tab=1&oauth2error=1".to_string()),
            }
        );
        assert!(!manager
            .store()
            .get_user("mock", "u1")
            .await
            .unwrap()
            .is_connected());
    }

    #[tokio::test]
    async fn test_error_marker_prevents_redirect_loop() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        let state = start(&manager, &session, "https://blog.example.com/admin").await;

        let request = ActionRequest {
            state: Some(state),
            error: Some("access_denied".to_string()),
            oauth2error: Some("1".to_string()),
            ..Default::default()
        };
        let outcome = manager.request_action(&request, &session, "u1").await.unwrap();

        let Outcome::Failed { redirect, .. } = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(redirect, None);
    }

    #[tokio::test]
    async fn test_vendor_error_in_token_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"error":"bad_verification_code","error_description":"The code is incorrect"}"#)
            .create_async()
            .await;

        let manager = manager(&server.url()).await;
        let session = MemorySession::new();
        let state = start(&manager, &session, "https://blog.example.com/admin").await;

        let outcome = manager
            .request_action(&callback(&state, "c1"), &session, "u1")
            .await
            .unwrap();

        let Outcome::Failed { notice, .. } = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(notice.message, "Unauthorized: The code is incorrect");
    }

    #[tokio::test]
    async fn test_refresh_keeps_previous_refresh_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "r1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"t2","expires_in":3600}"#)
            .create_async()
            .await;

        let manager = manager(&server.url()).await;
        manager
            .store()
            .set_user(
                "mock",
                "u1",
                UserRecord {
                    access_token: "t1".into(),
                    refresh_token: "r1".into(),
                    expires: 1,
                    scope: vec![],
                },
            )
            .await
            .unwrap();

        let session = MemorySession::new();
        let request = ActionRequest {
            refresh: Some("mock".to_string()),
            ..Default::default()
        };
        let outcome = manager.request_action(&request, &session, "u1").await.unwrap();

        mock.assert_async().await;
        assert!(matches!(outcome, Outcome::Redirect { .. }));

        let record = manager.store().get_user("mock", "u1").await.unwrap();
        assert_eq!(record.access_token, "t2");
        assert_eq!(record.refresh_token, "r1");
        assert!(record.expires > 1);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_fails() {
        let manager = manager("https://auth.example.com").await;
        let session = MemorySession::new();
        let request = ActionRequest {
            refresh: Some("mock".to_string()),
            ..Default::default()
        };

        let outcome = manager.request_action(&request, &session, "u1").await.unwrap();
        let Outcome::Failed { notice, redirect } = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(notice.message, "No refresh token stored for mock");
        assert_eq!(redirect.as_deref(), Some("https://blog.example.com/oauth2?oauth2error=1"));
    }

    #[tokio::test]
    async fn test_revoke_clears_token() {
        let manager = manager("https://auth.example.com").await;
        manager
            .store()
            .set_user(
                "mock",
                "u1",
                UserRecord {
                    access_token: "t1".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let session = MemorySession::new();
        let request = ActionRequest {
            revoke: Some("mock".to_string()),
            redir: Some("https://blog.example.com/admin".to_string()),
            ..Default::default()
        };
        let outcome = manager.request_action(&request, &session, "u1").await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Redirect {
                url: "https://blog.example.com/admin".to_string(),
                notice: Some(Notice::success("Service successfully disconnected")),
            }
        );
        assert!(!manager
            .store()
            .get_user("mock", "u1")
            .await
            .unwrap()
            .is_connected());
    }

    #[tokio::test]
    async fn test_insecure_redirect_uri_disables_providers() {
        let manager = manager_with("https://auth.example.com", "http://localhost:4000/oauth2").await;
        assert!(!manager.check_redirect_uri());
        assert!(!manager.check_provider("mock"));
        assert!(!manager.check_provider("github"));

        let session = MemorySession::new();
        let outcome = manager
            .request_action(&authorize("mock", None), &session, "u1")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn test_action_links() {
        let manager = manager("https://auth.example.com").await;

        assert_eq!(
            manager.action_link("mock", "u1", "https://blog.example.com/admin?x=1").await.as_deref(),
            Some("https://blog.example.com/oauth2?authorize=mock&redir=https%3A%2F%2Fblog.example.com%2Fadmin%3Fx%3D1")
        );

        manager
            .store()
            .set_user(
                "mock",
                "u1",
                UserRecord {
                    access_token: "t1".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let link = manager.action_link("mock", "u1", "/admin").await.unwrap();
        assert!(link.starts_with("https://blog.example.com/oauth2?revoke=mock&redir="));

        assert_eq!(manager.action_link("nope", "u1", "/admin").await, None);
        // auth0 has no consumer, its domain is missing
        assert_eq!(manager.action_link("auth0", "u1", "/admin").await, None);
    }

    #[tokio::test]
    async fn test_providers_listing() {
        let manager = manager("https://auth.example.com").await;
        let providers = manager.providers("u1", "/admin").await.unwrap();

        assert_eq!(providers.len(), 7);
        let mock = providers.iter().find(|p| p.id == "mock").unwrap();
        assert!(mock.enabled);
        assert!(!mock.connected);
        assert!(mock.action_link.is_some());

        let github = providers.iter().find(|p| p.id == "github").unwrap();
        assert_eq!(github.name, "Github");
        assert_eq!(github.protocol, "OAuth2");
        assert!(github.action_link.is_some());
    }

    #[tokio::test]
    async fn test_seed_consumers_skips_unknown_providers() {
        let manager = manager("https://auth.example.com").await;
        let seeded = manager
            .seed_consumers(vec![
                (
                    "slack".to_string(),
                    ConsumerCredentials {
                        key: "k".into(),
                        secret: "s".into(),
                        domain: None,
                    },
                ),
                ("nope".to_string(), ConsumerCredentials::default()),
            ])
            .await
            .unwrap();

        assert_eq!(seeded, 1);
        assert!(manager.store().get_consumer("slack").await.unwrap().is_configured());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let manager = manager("http://127.0.0.1:1").await;
        let session = MemorySession::new();
        let state = start(&manager, &session, "https://blog.example.com/admin").await;

        let outcome = manager
            .request_action(&callback(&state, "c1"), &session, "u1")
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Failed { redirect: Some(_), .. }));
    }
}
