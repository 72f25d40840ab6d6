//! Orchestration of the OAuth flows for a site and its users.
//!
//! `web` depends on this crate only: the engine types it needs are re-exported here.
pub use oauth_engine::http::{HttpTransport, Transport};
pub use oauth_engine::oauth::{providers, Consumer, ProviderConfig, ProviderKind};
pub use oauth_engine::Services;

pub mod error;
pub mod manager;
pub mod session;
pub mod store;

pub use manager::{ActionRequest, Notice, NoticeLevel, OAuthManager, Outcome, ProviderSummary};
pub use session::{FlowSession, MemorySession};
pub use store::{ConsumerRecord, MemoryStore, Store, UserRecord};
