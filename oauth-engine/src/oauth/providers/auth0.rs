//! Auth0 provider, hosted on a per-tenant domain.

use crate::oauth::{Consumer, ProviderKind};

pub struct Auth0;

impl ProviderKind for Auth0 {
    fn id(&self) -> &'static str {
        "auth0"
    }

    fn name(&self) -> &'static str {
        "Auth0"
    }

    fn description(&self) -> &'static str {
        "Centralize your auth access."
    }

    fn console_url(&self) -> &'static str {
        "https://manage.auth0.com/dashboard/"
    }

    fn authorize_uri(&self, consumer: &Consumer) -> String {
        format!("{}/authorize", consumer.domain())
    }

    fn access_token_uri(&self, consumer: &Consumer) -> String {
        format!("{}/oauth/token", consumer.domain())
    }

    fn request_uri(&self, consumer: &Consumer) -> String {
        format!("{}/api/v2/", consumer.domain())
    }

    fn requires_domain(&self) -> bool {
        true
    }
}
