//! Facebook provider.

use crate::oauth::{AuthStyle, Consumer, ProviderKind};

pub struct Facebook;

impl ProviderKind for Facebook {
    fn id(&self) -> &'static str {
        "facebook"
    }

    fn name(&self) -> &'static str {
        "Facebook"
    }

    fn description(&self) -> &'static str {
        "Share on your Facebook profile."
    }

    fn console_url(&self) -> &'static str {
        "https://developers.facebook.com/apps"
    }

    fn authorize_uri(&self, _consumer: &Consumer) -> String {
        "https://www.facebook.com/dialog/oauth".to_string()
    }

    fn access_token_uri(&self, _consumer: &Consumer) -> String {
        "https://graph.facebook.com/oauth/access_token".to_string()
    }

    fn request_uri(&self, _consumer: &Consumer) -> String {
        "https://graph.facebook.com/v12/".to_string()
    }

    fn default_scope(&self) -> &'static [&'static str] {
        &["public_profile"]
    }

    fn auth_style(&self) -> AuthStyle {
        AuthStyle::BearerHeader
    }
}
