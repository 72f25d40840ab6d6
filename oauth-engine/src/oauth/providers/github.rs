//! GitHub provider.

use crate::oauth::{AuthStyle, Consumer, ProviderKind};

pub struct Github;

impl ProviderKind for Github {
    fn id(&self) -> &'static str {
        "github"
    }

    fn name(&self) -> &'static str {
        "Github"
    }

    fn description(&self) -> &'static str {
        "Connect your Github profile and repo."
    }

    fn console_url(&self) -> &'static str {
        "https://github.com/settings/applications/"
    }

    fn authorize_uri(&self, _consumer: &Consumer) -> String {
        "https://github.com/login/oauth/authorize".to_string()
    }

    fn access_token_uri(&self, _consumer: &Consumer) -> String {
        "https://github.com/login/oauth/access_token".to_string()
    }

    fn request_uri(&self, _consumer: &Consumer) -> String {
        "https://api.github.com/user".to_string()
    }

    fn default_scope(&self) -> &'static [&'static str] {
        &["public_repo", "read:user", "notifications"]
    }

    fn auth_style(&self) -> AuthStyle {
        AuthStyle::BearerHeader
    }
}
