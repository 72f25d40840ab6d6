//! Error types for the `domain` layer.
use oauth_engine::error::{
    ConfigurationErrorKind, Error as EngineError, ErrorKind as EngineErrorKind,
    ProtocolErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree with `domain::error::Error` as the root
/// holding a tree of `error_kind` enums. Engine errors are translated here so that `web`
/// never depends on `oauth-engine` directly; the engine error is kept as `source`.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Flow(FlowErrorKind),
}

/// Failures of this deployment: configuration and the session holding flow data.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config(ConfigErrorKind),
    Session,
}

#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    UnknownProvider,
    DisabledProvider,
    ConsumerNotConfigured,
    MissingDomain,
    ProviderLoadFailed,
}

/// Failures reported by, or while talking to, a provider.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    /// The provider refused the authorization or the token request.
    Unauthorized,
    /// The provider answered with something that is not a usable token.
    InvalidResponse,
}

/// A request that does not fit the authorization flow.
#[derive(Debug, PartialEq)]
pub enum FlowErrorKind {
    MissingState,
    InvalidState,
    MissingCode,
    MissingRefreshToken,
}

impl Error {
    /// Message suitable for a user-visible notice.
    pub fn message(&self) -> String {
        match &self.source {
            Some(source) => match source.downcast_ref::<EngineError>() {
                Some(engine) => engine.message().unwrap_or_else(|| engine.to_string()),
                None => source.to_string(),
            },
            None => format!("{:?}", self.error_kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `oauth-engine` layer to the `domain` layer.
impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        let error_kind = match &err.error_kind {
            EngineErrorKind::Configuration(kind) => {
                let config_kind = match kind {
                    ConfigurationErrorKind::UnknownProvider => ConfigErrorKind::UnknownProvider,
                    ConfigurationErrorKind::DisabledProvider => ConfigErrorKind::DisabledProvider,
                    ConfigurationErrorKind::ConsumerNotConfigured => {
                        ConfigErrorKind::ConsumerNotConfigured
                    }
                    ConfigurationErrorKind::MissingDomain => ConfigErrorKind::MissingDomain,
                    ConfigurationErrorKind::ProviderLoadFailed => {
                        ConfigErrorKind::ProviderLoadFailed
                    }
                };
                DomainErrorKind::Internal(InternalErrorKind::Config(config_kind))
            }
            EngineErrorKind::Protocol(kind) => match kind {
                ProtocolErrorKind::Unauthorized => {
                    DomainErrorKind::External(ExternalErrorKind::Unauthorized)
                }
                ProtocolErrorKind::MissingState => DomainErrorKind::Flow(FlowErrorKind::MissingState),
                ProtocolErrorKind::InvalidState => DomainErrorKind::Flow(FlowErrorKind::InvalidState),
                ProtocolErrorKind::MissingCode => DomainErrorKind::Flow(FlowErrorKind::MissingCode),
                ProtocolErrorKind::EmptyResponse => {
                    DomainErrorKind::External(ExternalErrorKind::InvalidResponse)
                }
            },
            EngineErrorKind::Token(_) => {
                DomainErrorKind::External(ExternalErrorKind::InvalidResponse)
            }
            EngineErrorKind::Transport(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create session errors.
pub fn session_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Session),
    }
}

/// Helper function to create flow errors.
pub fn flow_error(kind: FlowErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Flow(kind),
    }
}

/// Helper function to create configuration errors.
pub fn config_error(kind: ConfigErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config(kind)),
    }
}
