//! OAuth 2.0 Authorization Code Grant client.

mod consumer;
mod provider;
mod scope;
mod state;

pub mod providers;
pub mod token;

pub use consumer::Consumer;
pub use provider::{
    AuthStyle, AuthorizationResponse, Provider, ProviderConfig, ProviderKind,
    REDIRECT_URI_PLACEHOLDER,
};
pub use scope::{join_scope, split_scope, DEFAULT_SCOPE_DELIMITER};
pub use state::{check_state, generate_state};
