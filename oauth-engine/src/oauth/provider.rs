//! OAuth provider capability and the Authorization Code Grant engine.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::debug;

use super::consumer::Consumer;
use super::scope::{join_scope, split_scope};
use super::state::{check_state, generate_state};
use super::token::{parse_token, Token};
use crate::error::{
    configuration_error, protocol_error, transport_error, ConfigurationErrorKind, Error,
    ProtocolErrorKind, TransportErrorKind,
};
use crate::http::{Method, Parameters, Response, Transport};

/// Placeholder replaced by the provider id in redirect URI templates.
pub const REDIRECT_URI_PLACEHOLDER: &str = "PROVIDER";

/// How an access token is attached to resource requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `access_token` query (or body) parameter.
    QueryParameter,
    /// `Authorization: Bearer <token>` header.
    BearerHeader,
}

/// Facts one provider variant supplies to the engine.
///
/// Implementations only describe endpoints and quirks; the grant itself is run by [`Provider`].
pub trait ProviderKind: Send + Sync {
    /// Unique provider identifier.
    fn id(&self) -> &'static str;

    /// Display name.
    fn name(&self) -> &'static str;

    /// Short description.
    fn description(&self) -> &'static str;

    /// URL where applications are registered with the provider.
    fn console_url(&self) -> &'static str;

    fn protocol(&self) -> &'static str {
        "OAuth2"
    }

    /// Authorization endpoint.
    fn authorize_uri(&self, consumer: &Consumer) -> String;

    /// Token endpoint.
    fn access_token_uri(&self, consumer: &Consumer) -> String;

    /// Token endpoint used for refresh grants.
    fn refresh_token_uri(&self, consumer: &Consumer) -> String {
        self.access_token_uri(consumer)
    }

    /// Base URL of the resource API.
    fn request_uri(&self, consumer: &Consumer) -> String;

    fn scope_delimiter(&self) -> &'static str {
        " "
    }

    /// Returns true when endpoints are built from the consumer's domain.
    fn requires_domain(&self) -> bool {
        false
    }

    /// Scopes requested when the configuration does not set any.
    fn default_scope(&self) -> &'static [&'static str] {
        &[]
    }

    fn auth_style(&self) -> AuthStyle {
        AuthStyle::QueryParameter
    }
}

impl fmt::Debug for dyn ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderKind").field("id", &self.id()).finish()
    }
}

/// Configuration a provider instance is built from.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub domain: Option<String>,
    /// Previously issued state, set when handling a callback.
    pub state: Option<String>,
    /// Replaces the provider's default scope when set.
    pub scope: Option<Vec<String>>,
    /// Redirect URI template, `PROVIDER` is replaced by the provider id.
    pub redirect_uri: Option<String>,
}

impl ProviderConfig {
    /// Configuration with consumer credentials.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_scope<S: Into<String>>(mut self, scope: impl IntoIterator<Item = S>) -> Self {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}

/// Parameters the provider sends back to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationResponse {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A provider bound to one consumer, used for a single authorize or exchange operation.
pub struct Provider {
    kind: Arc<dyn ProviderKind>,
    consumer: Consumer,
    scope: Vec<String>,
    state: OnceLock<String>,
    redirect_uri: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.kind.id())
            .field("consumer", &self.consumer)
            .field("scope", &self.scope)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl Provider {
    /// Bind a provider variant to a configuration.
    ///
    /// Fails when the consumer key or secret is missing, or when the variant requires a
    /// domain and none is configured. Empty credentials are accepted,
    /// [`Consumer::is_configured`] reports them.
    pub fn new(
        kind: Arc<dyn ProviderKind>,
        config: ProviderConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let (key, secret) = match (config.key, config.secret) {
            (Some(key), Some(secret)) => (key, secret),
            _ => {
                return Err(configuration_error(
                    ConfigurationErrorKind::ConsumerNotConfigured,
                    "Consumer is not configured",
                ))
            }
        };

        let consumer = Consumer::new(key, secret, config.domain);
        if kind.requires_domain() && consumer.domain().is_empty() {
            return Err(configuration_error(
                ConfigurationErrorKind::MissingDomain,
                &format!("Provider {} requires a domain", kind.id()),
            ));
        }

        let scope = config.scope.unwrap_or_else(|| {
            kind.default_scope()
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        let state = OnceLock::new();
        if let Some(value) = config.state.filter(|s| !s.is_empty()) {
            let _ = state.set(value);
        }

        Ok(Self {
            kind,
            consumer,
            scope,
            state,
            redirect_uri: config.redirect_uri.unwrap_or_default(),
            transport,
        })
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub fn console_url(&self) -> &'static str {
        self.kind.console_url()
    }

    pub fn protocol(&self) -> &'static str {
        self.kind.protocol()
    }

    pub fn kind(&self) -> &Arc<dyn ProviderKind> {
        &self.kind
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    pub fn requires_domain(&self) -> bool {
        self.kind.requires_domain()
    }

    pub fn domain(&self) -> &str {
        self.consumer.domain()
    }

    /// CSRF state, generated on first access when none was configured.
    pub fn state(&self) -> &str {
        self.state.get_or_init(generate_state)
    }

    /// Replace the CSRF state.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = OnceLock::from(state.into());
    }

    /// Compare a received state with this provider's state.
    pub fn check_state(&self, state: &str) -> bool {
        check_state(self.state(), state)
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }

    pub fn scope_delimiter(&self) -> &'static str {
        self.kind.scope_delimiter()
    }

    /// Serialize scopes with this provider's delimiter.
    pub fn scope_to_string<S: AsRef<str>>(&self, scope: &[S]) -> String {
        join_scope(scope, self.scope_delimiter())
    }

    /// Split a scope string with this provider's delimiter.
    pub fn scope_from_str(&self, scope: &str) -> Vec<String> {
        split_scope(scope, self.scope_delimiter())
    }

    /// Redirect URI with the provider id substituted into the template.
    pub fn redirect_url(&self) -> String {
        self.redirect_uri
            .replace(REDIRECT_URI_PLACEHOLDER, self.kind.id())
    }

    pub fn authorize_uri(&self) -> String {
        self.kind.authorize_uri(&self.consumer)
    }

    pub fn access_token_uri(&self) -> String {
        self.kind.access_token_uri(&self.consumer)
    }

    pub fn refresh_token_uri(&self) -> String {
        self.kind.refresh_token_uri(&self.consumer)
    }

    pub fn request_uri(&self) -> String {
        self.kind.request_uri(&self.consumer)
    }

    /// Build the URL the user agent is redirected to for consent.
    pub fn authorize_url(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("client_id", self.consumer.key())
            .append_pair("redirect_uri", &self.redirect_url())
            .append_pair("response_type", "code")
            .append_pair("state", self.state());
        if !self.scope.is_empty() {
            query.append_pair("scope", &self.scope_to_string(&self.scope));
        }

        format!("{}?{}", self.authorize_uri(), query.finish())
    }

    /// Validate the authorization callback and exchange its code for a token.
    ///
    /// Checks run in order: remote error, missing state, state mismatch, missing code.
    /// No request is made unless all of them pass.
    pub async fn request_access_token(
        &self,
        response: &AuthorizationResponse,
    ) -> Result<Token, Error> {
        if let Some(error) = non_empty(&response.error) {
            return Err(protocol_error(
                ProtocolErrorKind::Unauthorized,
                &format!("Unauthorized: {}", error),
            ));
        }

        let state = non_empty(&response.state).ok_or_else(|| {
            protocol_error(ProtocolErrorKind::MissingState, "Unknown response state")
        })?;

        if !self.check_state(state) {
            return Err(protocol_error(
                ProtocolErrorKind::InvalidState,
                "Invalid response state",
            ));
        }

        let code = non_empty(&response.code).ok_or_else(|| {
            protocol_error(ProtocolErrorKind::MissingCode, "Invalid response code")
        })?;

        debug!("Exchanging authorization code with {}", self.id());

        let parameters: Parameters = vec![
            ("client_id".to_string(), self.consumer.key().to_string()),
            ("client_secret".to_string(), self.consumer.secret().to_string()),
            ("redirect_uri".to_string(), self.redirect_url()),
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
        ];

        self.fetch_token(&self.access_token_uri(), &parameters).await
    }

    /// Exchange a refresh token for a new token.
    pub async fn request_refresh_token(&self, refresh_token: &str) -> Result<Token, Error> {
        debug!("Refreshing access token with {}", self.id());

        let parameters: Parameters = vec![
            ("client_id".to_string(), self.consumer.key().to_string()),
            ("client_secret".to_string(), self.consumer.secret().to_string()),
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ];

        self.fetch_token(&self.refresh_token_uri(), &parameters).await
    }

    async fn fetch_token(&self, uri: &str, parameters: &[(String, String)]) -> Result<Token, Error> {
        let headers = vec![("Accept".to_string(), "application/json".to_string())];
        let response = self
            .transport
            .request(Method::POST, uri, parameters, &headers)
            .await;

        let content = usable_content(response)?;
        parse_token(&content, self.scope_delimiter())
    }

    /// Call the provider's resource API and return the raw body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - Path appended to the provider's request URI
    /// * `query` - Request parameters
    /// * `access_token` - Token attached according to the provider's auth style
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: Parameters,
        access_token: &str,
    ) -> Result<String, Error> {
        let (parameters, headers) = self.sign_request(query, access_token);
        let url = format!("{}{}", self.request_uri(), endpoint);

        let response = self
            .transport
            .request(method, &url, &parameters, &headers)
            .await;

        usable_content(response)
    }

    fn sign_request(&self, mut query: Parameters, access_token: &str) -> (Parameters, Parameters) {
        let mut headers = Parameters::new();
        if access_token.is_empty() {
            return (query, headers);
        }

        match self.kind.auth_style() {
            AuthStyle::QueryParameter => {
                query.push(("access_token".to_string(), access_token.to_string()));
            }
            AuthStyle::BearerHeader => {
                headers.push((
                    "Authorization".to_string(),
                    format!("Bearer {}", access_token),
                ));
            }
        }

        (query, headers)
    }
}

fn usable_content(response: Response) -> Result<String, Error> {
    if response.has_content() {
        return Ok(response.content);
    }

    if !response.error.is_empty() {
        return Err(transport_error(
            TransportErrorKind::RequestFailed,
            &response.error,
        ));
    }

    Err(protocol_error(
        ProtocolErrorKind::EmptyResponse,
        "empty response content",
    ))
}
