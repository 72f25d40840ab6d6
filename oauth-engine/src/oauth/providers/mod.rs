//! Built-in provider variants.

use std::sync::Arc;

use super::ProviderKind;

mod auth0;
mod facebook;
mod github;
mod instagram;
mod slack;
mod tumblr;

pub use auth0::Auth0;
pub use facebook::Facebook;
pub use github::Github;
pub use instagram::Instagram;
pub use slack::Slack;
pub use tumblr::Tumblr;

/// Every built-in variant, in registration order.
pub fn default_providers() -> Vec<Arc<dyn ProviderKind>> {
    vec![
        Arc::new(Auth0),
        Arc::new(Facebook),
        Arc::new(Github),
        Arc::new(Instagram),
        Arc::new(Slack),
        Arc::new(Tumblr),
    ]
}
