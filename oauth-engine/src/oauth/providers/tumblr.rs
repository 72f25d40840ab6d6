//! Tumblr provider.

use crate::oauth::{Consumer, ProviderKind};

pub struct Tumblr;

impl ProviderKind for Tumblr {
    fn id(&self) -> &'static str {
        "tumblr"
    }

    fn name(&self) -> &'static str {
        "Tumblr"
    }

    fn description(&self) -> &'static str {
        "Share on your Tumblr blog."
    }

    fn console_url(&self) -> &'static str {
        "https://www.tumblr.com/oauth/apps"
    }

    fn authorize_uri(&self, _consumer: &Consumer) -> String {
        "https://www.tumblr.com/oauth2/authorize".to_string()
    }

    fn access_token_uri(&self, _consumer: &Consumer) -> String {
        "https://api.tumblr.com/v2/oauth2/token".to_string()
    }

    fn request_uri(&self, _consumer: &Consumer) -> String {
        "https://api.tumblr.com/v2/".to_string()
    }

    fn default_scope(&self) -> &'static [&'static str] {
        &["write", "offline_access"]
    }
}
