//! One checkout session: the cache, resolver, search coordinator and
//! validation engine behind the checkout form.

use std::sync::Arc;
use thiserror::Error;

use crate::config::CheckoutConfig;
use crate::geo::providers::{GeoProvider, RichRemoteProvider, SimpleRemoteProvider, StaticProvider, TotalProvider};
use crate::geo::{City, Country, CountryInfo, GeoResolver, ResolutionCache};
use crate::search::SearchCoordinator;
use crate::validation::{Clock, FieldId, FieldSnapshot, FormSnapshot, ValidationEngine};

/// Session construction failures. Only bad configuration gets here; lookups
/// themselves never fail.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid {tier} provider URL: {source}")]
    ProviderUrl {
        tier: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Entry point for the checkout form.
pub struct CheckoutSession {
    config: CheckoutConfig,
    resolver: Arc<GeoResolver>,
    search: SearchCoordinator,
    engine: ValidationEngine,
}

impl CheckoutSession {
    /// Build the provider chain described by `config`.
    pub fn new(config: CheckoutConfig) -> Result<Self, SessionError> {
        let mut remotes: Vec<(Arc<dyn GeoProvider>, u64)> = Vec::new();

        let rich = &config.providers.rich;
        if rich.enabled {
            let provider = RichRemoteProvider::new(rich)
                .map_err(|source| SessionError::ProviderUrl { tier: "rich", source })?;
            remotes.push((Arc::new(provider), rich.timeout_ms));
        }

        let simple = &config.providers.simple;
        if simple.enabled {
            let provider = SimpleRemoteProvider::new(simple)
                .map_err(|source| SessionError::ProviderUrl { tier: "simple", source })?;
            remotes.push((Arc::new(provider), simple.timeout_ms));
        }

        let session = Self::with_providers(config, remotes, Arc::new(StaticProvider::new()));
        tracing::info!(tiers = ?session.resolver.tier_order(), "Checkout session ready");
        Ok(session)
    }

    /// Build a session over explicit providers, each with its deadline in ms.
    pub fn with_providers(
        config: CheckoutConfig,
        remotes: Vec<(Arc<dyn GeoProvider>, u64)>,
        fallback: Arc<dyn TotalProvider>,
    ) -> Self {
        let mut resolver = GeoResolver::new(Arc::new(ResolutionCache::new()), fallback)
            .with_search_config(config.search.clone())
            .with_postal_config(config.postal.clone());
        for (provider, timeout_ms) in remotes {
            resolver = resolver.with_tier(provider, timeout_ms, &config.resilience);
        }
        let resolver = Arc::new(resolver);
        Self {
            search: SearchCoordinator::new(Arc::clone(&resolver)),
            resolver,
            engine: ValidationEngine::new(),
            config,
        }
    }

    /// Pin the date used by expiry checks.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.engine = ValidationEngine::with_clock(clock);
        self
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<GeoResolver> {
        &self.resolver
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        self.resolver.cache()
    }

    /// The debounced city search bound to this session's cache.
    pub fn search(&self) -> &SearchCoordinator {
        &self.search
    }

    pub async fn resolve_countries(&self) -> Vec<Country> {
        self.resolver.resolve_countries().await
    }

    pub async fn resolve_cities(&self, country_code: &str, query: &str) -> Vec<City> {
        self.resolver.resolve_cities(country_code, query).await
    }

    pub async fn resolve_postal_codes(&self, country_code: &str, city_name: &str) -> Vec<String> {
        self.resolver.resolve_postal_codes(country_code, city_name).await
    }

    pub async fn country_info(&self, country_code: &str) -> CountryInfo {
        self.resolver.country_info(country_code).await
    }

    pub fn validate_field(&self, field: FieldId, value: &str, form: &FormSnapshot) -> FieldSnapshot {
        self.engine.validate_field(field, value, form)
    }

    pub fn validate_all(&self, form: &FormSnapshot) -> Vec<FieldSnapshot> {
        self.engine.validate_all(form)
    }

    pub fn validate_form(&self, form: &FormSnapshot) -> bool {
        self.engine.validate_form(form)
    }
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("resolver", &self.resolver)
            .field("engine", &self.engine)
            .finish()
    }
}
