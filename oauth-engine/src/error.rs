//! Error types for the `oauth-engine` crate.
//!
//! Follows the same pattern as the other layers: a root Error struct holding an error kind
//! tree and an optional source for chaining. Callers match on `error_kind` to tell a CSRF
//! rejection apart from a network failure or a configuration problem.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for oauth-engine.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors raised by the engine.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Configuration(ConfigurationErrorKind),
    Protocol(ProtocolErrorKind),
    Token(TokenErrorKind),
    Transport(TransportErrorKind),
}

/// Problems with how a provider was registered or configured.
#[derive(Debug, PartialEq)]
pub enum ConfigurationErrorKind {
    UnknownProvider,
    DisabledProvider,
    ConsumerNotConfigured,
    MissingDomain,
    ProviderLoadFailed,
}

/// Violations of the Authorization Code Grant exchange.
#[derive(Debug, PartialEq)]
pub enum ProtocolErrorKind {
    /// The provider reported an error, either on the callback or in a response body.
    Unauthorized,
    MissingState,
    InvalidState,
    MissingCode,
    EmptyResponse,
}

/// A token response that cannot be turned into a valid token.
#[derive(Debug, PartialEq)]
pub enum TokenErrorKind {
    InvalidFormat,
    MissingAccessToken,
}

/// Failures of the HTTP stack itself.
#[derive(Debug, PartialEq)]
pub enum TransportErrorKind {
    BuilderFailed,
    RequestFailed,
}

impl Error {
    /// Message carried by the source, if any.
    pub fn message(&self) -> Option<String> {
        self.source.as_ref().map(|source| source.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match &self.error_kind {
            ErrorKind::Configuration(kind) => format!("Configuration error: {:?}", kind),
            ErrorKind::Protocol(kind) => format!("Protocol error: {:?}", kind),
            ErrorKind::Token(kind) => format!("Token error: {:?}", kind),
            ErrorKind::Transport(kind) => format!("Transport error: {:?}", kind),
        };
        match &self.source {
            Some(source) => write!(f, "{} ({})", prefix, source),
            None => write!(f, "{}", prefix),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Transport(TransportErrorKind::BuilderFailed)
        } else {
            ErrorKind::Transport(TransportErrorKind::RequestFailed)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Token(TokenErrorKind::InvalidFormat),
        }
    }
}

/// Helper function to create configuration errors.
pub fn configuration_error(kind: ConfigurationErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Configuration(kind),
    }
}

/// Wraps a provider construction failure. The cause stays reachable through `source()`.
pub fn provider_load_error(id: &str, cause: Error) -> Error {
    Error {
        source: Some(Box::new(ProviderLoadError {
            id: id.to_string(),
            cause,
        })),
        error_kind: ErrorKind::Configuration(ConfigurationErrorKind::ProviderLoadFailed),
    }
}

#[derive(Debug)]
struct ProviderLoadError {
    id: String,
    cause: Error,
}

impl fmt::Display for ProviderLoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Failed to load provider {}", self.id)
    }
}

impl StdError for ProviderLoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

/// Helper function to create protocol errors.
pub fn protocol_error(kind: ProtocolErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Protocol(kind),
    }
}

/// Helper function to create token errors.
pub fn token_error(kind: TokenErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Token(kind),
    }
}

/// Helper function to create transport errors.
pub fn transport_error(kind: TransportErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Transport(kind),
    }
}
