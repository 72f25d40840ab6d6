//! Instagram provider.

use crate::oauth::{Consumer, ProviderKind};

pub struct Instagram;

impl ProviderKind for Instagram {
    fn id(&self) -> &'static str {
        "instagram"
    }

    fn name(&self) -> &'static str {
        "Instagram"
    }

    fn description(&self) -> &'static str {
        "Interact with your Instagram."
    }

    fn console_url(&self) -> &'static str {
        "https://developers.facebook.com/apps"
    }

    fn authorize_uri(&self, _consumer: &Consumer) -> String {
        "https://api.instagram.com/oauth/authorize".to_string()
    }

    fn access_token_uri(&self, _consumer: &Consumer) -> String {
        "https://api.instagram.com/oauth/access_token".to_string()
    }

    fn request_uri(&self, _consumer: &Consumer) -> String {
        "https://graph.instagram.com/".to_string()
    }

    fn default_scope(&self) -> &'static [&'static str] {
        &["user_profile", "user_media"]
    }
}
