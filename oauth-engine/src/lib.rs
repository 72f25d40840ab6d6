//! # oauth-engine
//!
//! OAuth 2.0 Authorization Code Grant client shared by every provider:
//! - HTTP transport returning structured responses
//! - Provider engine (authorize URL, code exchange, refresh, resource requests)
//! - Token parsing with vendor error detection
//! - Built-in provider variants and their registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oauth_engine::{http::HttpTransport, oauth::ProviderConfig, Services};
//!
//! let services = Services::new(vec!["tumblr"], Arc::new(HttpTransport::new()?));
//! let provider = services.get_provider("github", ProviderConfig::new(key, secret))?;
//! let url = provider.authorize_url();
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod services;

pub use error::{Error, ErrorKind};
pub use services::Services;
