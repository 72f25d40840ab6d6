//! Registry of available provider variants.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{configuration_error, provider_load_error, ConfigurationErrorKind, Error};
use crate::http::Transport;
use crate::oauth::providers::default_providers;
use crate::oauth::{Consumer, Provider, ProviderConfig, ProviderKind};

/// Maps provider ids to variants, minus the disabled ones.
///
/// Ids are kept in order so listings are stable.
#[derive(Clone)]
pub struct Services {
    providers: BTreeMap<String, Arc<dyn ProviderKind>>,
    disabled: HashSet<String>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl Services {
    /// Create a registry holding the built-in variants, minus the disabled ones.
    ///
    /// # Arguments
    ///
    /// * `disabled` - Provider ids that are never registered
    /// * `transport` - Transport handed to providers built by [`Services::get_provider`]
    pub fn new<S: Into<String>>(
        disabled: impl IntoIterator<Item = S>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let mut services = Self::empty(disabled, transport);
        let accepted = services.register(
            default_providers()
                .into_iter()
                .map(|kind| (kind.id().to_string(), kind)),
        );
        debug!("Registered {} built-in providers", accepted);
        services
    }

    /// Create a registry without any variant.
    pub fn empty<S: Into<String>>(
        disabled: impl IntoIterator<Item = S>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            providers: BTreeMap::new(),
            disabled: disabled
                .into_iter()
                .map(|id| {
                    let id: String = id.into();
                    id.trim().to_string()
                })
                .filter(|id| !id.is_empty())
                .collect(),
            transport,
        }
    }

    /// Register a variant under `id`.
    ///
    /// Returns false, leaving the registry unchanged, when the id is empty or disabled, when it
    /// differs from the variant's own id, when the variant has no name, or when a variant
    /// without a custom domain does not declare absolute http(s) endpoints.
    /// A later registration under the same id replaces the earlier one.
    pub fn add_provider(&mut self, id: &str, kind: Arc<dyn ProviderKind>) -> bool {
        if id.is_empty() || self.disabled.contains(id) {
            debug!("Skipping provider {:?}", id);
            return false;
        }

        if kind.id() != id || kind.name().is_empty() || !has_valid_endpoints(kind.as_ref()) {
            warn!("Rejecting invalid provider {:?}", id);
            return false;
        }

        self.providers.insert(id.to_string(), kind);
        true
    }

    /// Register extension variants, returns how many were accepted.
    pub fn register(
        &mut self,
        kinds: impl IntoIterator<Item = (String, Arc<dyn ProviderKind>)>,
    ) -> usize {
        kinds
            .into_iter()
            .filter(|(id, kind)| self.add_provider(id, kind.clone()))
            .count()
    }

    /// Build a provider instance with the registry's transport.
    pub fn get_provider(&self, id: &str, config: ProviderConfig) -> Result<Provider, Error> {
        self.get_provider_with(id, config, self.transport.clone())
    }

    /// Build a provider instance with an explicit transport.
    ///
    /// Fails with `DisabledProvider` or `UnknownProvider` before anything is built. Any
    /// construction failure is reported as `ProviderLoadFailed`, its cause kept as source.
    pub fn get_provider_with(
        &self,
        id: &str,
        config: ProviderConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Provider, Error> {
        self.ensure_enabled(id)?;
        self.ensure_provider(id)?;

        let kind = self.providers[id].clone();
        Provider::new(kind, config, transport).map_err(|err| {
            debug!("Failed to load provider {}: {}", id, err);
            provider_load_error(id, err)
        })
    }

    /// All registered variants keyed by id.
    pub fn get_providers(&self) -> &BTreeMap<String, Arc<dyn ProviderKind>> {
        &self.providers
    }

    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Fails with `UnknownProvider` when nothing is registered under `id`.
    pub fn ensure_provider(&self, id: &str) -> Result<(), Error> {
        if self.has_provider(id) {
            Ok(())
        } else {
            Err(configuration_error(
                ConfigurationErrorKind::UnknownProvider,
                &format!("Unknown provider {}", id),
            ))
        }
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.contains(id)
    }

    /// Fails with `DisabledProvider` when `id` is disabled.
    pub fn ensure_enabled(&self, id: &str) -> Result<(), Error> {
        if self.is_disabled(id) {
            Err(configuration_error(
                ConfigurationErrorKind::DisabledProvider,
                &format!("Provider {} is disabled", id),
            ))
        } else {
            Ok(())
        }
    }

    /// Disable `id`. A registered variant stays listed but can no longer be instantiated,
    /// and a later `add_provider` under that id is refused.
    pub fn add_disabled_provider(&mut self, id: &str) {
        let id = id.trim();
        if !id.is_empty() {
            self.disabled.insert(id.to_string());
        }
    }

    /// Disable every registered provider, used when the redirect URI cannot be served.
    pub fn disable_all(&mut self) {
        let ids: Vec<String> = self.providers.keys().cloned().collect();
        for id in ids {
            self.add_disabled_provider(&id);
        }
    }
}

fn has_valid_endpoints(kind: &dyn ProviderKind) -> bool {
    if kind.requires_domain() {
        return true;
    }

    let consumer = Consumer::new("", "", None);
    [kind.authorize_uri(&consumer), kind.access_token_uri(&consumer)]
        .iter()
        .all(|uri| is_absolute_http(uri))
}

fn is_absolute_http(uri: &str) -> bool {
    match url::Url::parse(uri) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
