//! Slack provider.

use crate::oauth::{AuthStyle, Consumer, ProviderKind};

pub struct Slack;

impl ProviderKind for Slack {
    fn id(&self) -> &'static str {
        "slack"
    }

    fn name(&self) -> &'static str {
        "Slack"
    }

    fn description(&self) -> &'static str {
        "Link your Slack workspace."
    }

    fn console_url(&self) -> &'static str {
        "https://api.slack.com/apps"
    }

    fn authorize_uri(&self, _consumer: &Consumer) -> String {
        "https://slack.com/oauth/v2/authorize".to_string()
    }

    fn access_token_uri(&self, _consumer: &Consumer) -> String {
        "https://slack.com/api/oauth.v2.access".to_string()
    }

    fn request_uri(&self, _consumer: &Consumer) -> String {
        "https://slack.com/api/".to_string()
    }

    fn default_scope(&self) -> &'static [&'static str] {
        &["chat:write", "channels:history", "channels:join"]
    }

    fn auth_style(&self) -> AuthStyle {
        AuthStyle::BearerHeader
    }
}
