//! Cache-first, tier-by-tier geo resolution.
//!
//! # Responsibilities
//! - Serve repeated lookups from the session cache
//! - Walk the remote tiers in preference order, each under its own deadline
//!   and circuit breaker
//! - Fall back to the total static tier, then to synthesized postal codes
//!
//! Nothing here returns an error: a failing tier is logged and skipped.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::{CircuitBreakerConfig, PostalConfig, SearchConfig};
use crate::geo::cache::{CacheKey, ResolutionCache};
use crate::geo::postal::synthesize_postal_codes;
use crate::geo::providers::{dedupe_countries, GeoProvider, TotalProvider};
use crate::geo::types::{
    fold_key, normalize_code, prefix_key, City, Country, CountryInfo, ProviderError,
    ProviderResult, Tier,
};
use crate::observability::metrics;
use crate::resilience::{with_deadline, CircuitBreaker};

/// Cities fetched per prefix, relative to the suggestion limit, so that
/// longer queries sharing the prefix can be answered from the cache.
const CITY_FETCH_FACTOR: usize = 5;

type TierCall<'a, T> = Pin<Box<dyn Future<Output = ProviderResult<T>> + Send + 'a>>;

/// A remote tier with its deadline and breaker.
struct RemoteTier {
    provider: Arc<dyn GeoProvider>,
    timeout_ms: u64,
    breaker: CircuitBreaker,
}

/// Resolves countries, cities and postal codes. Never fails.
pub struct GeoResolver {
    cache: Arc<ResolutionCache>,
    tiers: Vec<RemoteTier>,
    fallback: Arc<dyn TotalProvider>,
    search: SearchConfig,
    postal: PostalConfig,
}

impl GeoResolver {
    /// A resolver with no remote tiers, backed by `fallback`.
    pub fn new(cache: Arc<ResolutionCache>, fallback: Arc<dyn TotalProvider>) -> Self {
        Self {
            cache,
            tiers: Vec::new(),
            fallback,
            search: SearchConfig::default(),
            postal: PostalConfig::default(),
        }
    }

    /// Append a remote tier. Tiers are tried in the order they are added.
    pub fn with_tier(
        mut self,
        provider: Arc<dyn GeoProvider>,
        timeout_ms: u64,
        breaker: &CircuitBreakerConfig,
    ) -> Self {
        self.tiers.push(RemoteTier {
            provider,
            timeout_ms,
            breaker: CircuitBreaker::new(breaker),
        });
        self
    }

    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_postal_config(mut self, postal: PostalConfig) -> Self {
        self.postal = postal;
        self
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Tiers in the order they are tried, ending with the static backstop.
    pub fn tier_order(&self) -> Vec<Tier> {
        self.tiers
            .iter()
            .map(|t| t.provider.tier())
            .chain(std::iter::once(Tier::Static))
            .collect()
    }

    /// Try each remote tier in turn. Returns the first result `accept` agrees
    /// with, or `None` when every tier failed or came back empty-handed.
    async fn try_remote_tiers<'s, T, F, A>(
        &'s self,
        op: &'static str,
        call: F,
        accept: A,
    ) -> Option<(T, Tier)>
    where
        F: Fn(&'s dyn GeoProvider) -> TierCall<'s, T>,
        A: Fn(&T) -> bool,
    {
        for remote in &self.tiers {
            let tier = remote.provider.tier();
            if !remote.breaker.try_acquire() {
                tracing::debug!(tier = %tier, op, "Circuit open, skipping tier");
                metrics::record_provider_call(tier, "skipped");
                continue;
            }

            match with_deadline(remote.timeout_ms, call(remote.provider.as_ref())).await {
                Ok(value) if accept(&value) => {
                    remote.breaker.record_success();
                    metrics::record_provider_call(tier, "ok");
                    return Some((value, tier));
                }
                Ok(_) => {
                    remote.breaker.record_success();
                    metrics::record_provider_call(tier, "empty");
                    tracing::debug!(tier = %tier, op, "Tier had no data, trying next tier");
                }
                Err(ProviderError::Unsupported(what)) => {
                    metrics::record_provider_call(tier, "unsupported");
                    tracing::debug!(tier = %tier, op, what, "Tier does not support lookup");
                }
                Err(e) => {
                    remote.breaker.record_failure();
                    metrics::record_provider_call(tier, "error");
                    tracing::warn!(tier = %tier, op, error = %e, "Tier failed, trying next tier");
                }
            }
        }
        None
    }

    /// Every known country, de-duplicated by code and sorted by name.
    pub async fn resolve_countries(&self) -> Vec<Country> {
        let (entry, hit) = self
            .cache
            .countries()
            .get_or_resolve(CacheKey::Countries, || async {
                match self
                    .try_remote_tiers("list_countries", |p| p.list_countries(), |l: &Vec<Country>| {
                        !l.is_empty()
                    })
                    .await
                {
                    Some((list, tier)) => (dedupe_countries(list), tier),
                    None => (self.fallback.list_countries(), Tier::Static),
                }
            })
            .await;
        self.note_lookup(&entry.key, entry.tier, hit);
        entry.value.clone()
    }

    /// City suggestions for a query typed in the city field.
    ///
    /// Queries shorter than the configured minimum return nothing without
    /// touching the cache or any provider.
    ///
    /// One cache entry serves every query sharing a `(country, prefix)` key
    /// and holds at most `city_limit * 5` places in the order the tier
    /// returned them (largest first for the remote tiers). Longer queries are
    /// filtered from that entry only, so a small place can be missing when
    /// more than that many larger places share its prefix.
    pub async fn resolve_cities(&self, country_code: &str, query: &str) -> Vec<City> {
        let query = query.trim();
        let country = normalize_code(country_code);
        if country.is_empty() || query.chars().count() < self.search.min_query_len {
            return Vec::new();
        }

        let prefix = prefix_key(query, self.search.cache_prefix_len);
        let fetch_limit = self.search.city_limit.saturating_mul(CITY_FETCH_FACTOR);
        let key = CacheKey::Cities {
            country: country.clone(),
            prefix: prefix.clone(),
        };
        let (entry, hit) = self
            .cache
            .cities()
            .get_or_resolve(key, || async {
                match self
                    .try_remote_tiers(
                        "search_cities",
                        |p| p.search_cities(&country, &prefix, fetch_limit),
                        |_| true,
                    )
                    .await
                {
                    Some(found) => found,
                    None => (
                        self.fallback.search_cities(&country, &prefix, fetch_limit),
                        Tier::Static,
                    ),
                }
            })
            .await;
        self.note_lookup(&entry.key, entry.tier, hit);

        let needle = fold_key(query);
        entry
            .value
            .iter()
            .filter(|c| fold_key(&c.name).starts_with(&needle))
            .take(self.search.city_limit)
            .cloned()
            .collect()
    }

    /// Postal codes for a city. Never empty for a non-blank city name: when
    /// no tier knows any code, plausible ones are synthesized.
    pub async fn resolve_postal_codes(&self, country_code: &str, city_name: &str) -> Vec<String> {
        let country = normalize_code(country_code);
        let city = fold_key(city_name);
        if city.is_empty() {
            return Vec::new();
        }

        let key = CacheKey::PostalCodes {
            country: country.clone(),
            city,
        };
        let (entry, hit) = self
            .cache
            .postal_codes()
            .get_or_resolve(key, || async {
                if let Some(found) = self
                    .try_remote_tiers(
                        "postal_codes_for_city",
                        |p| p.postal_codes_for_city(&country, city_name),
                        |codes: &Vec<String>| !codes.is_empty(),
                    )
                    .await
                {
                    return found;
                }

                let codes = self.fallback.postal_codes_for_city(&country, city_name);
                if !codes.is_empty() {
                    return (codes, Tier::Static);
                }

                let codes = synthesize_postal_codes(&country, city_name, self.postal.synthesized_count);
                metrics::record_postal_synthesized(&country);
                tracing::debug!(
                    country = %country,
                    city = city_name,
                    count = codes.len(),
                    "Synthesized postal codes"
                );
                (codes, Tier::Synthesized)
            })
            .await;
        self.note_lookup(&entry.key, entry.tier, hit);
        entry.value.clone()
    }

    /// Extended details for one country.
    pub async fn country_info(&self, country_code: &str) -> CountryInfo {
        let country = normalize_code(country_code);
        let key = CacheKey::CountryInfo {
            country: country.clone(),
        };
        let (entry, hit) = self
            .cache
            .country_info()
            .get_or_resolve(key, || async {
                match self
                    .try_remote_tiers("country_info", |p| p.country_info(&country), |_| true)
                    .await
                {
                    Some(found) => found,
                    None => (self.fallback.country_info(&country), Tier::Static),
                }
            })
            .await;
        self.note_lookup(&entry.key, entry.tier, hit);
        entry.value.clone()
    }

    fn note_lookup(&self, key: &CacheKey, tier: Tier, hit: bool) {
        metrics::record_cache_lookup(key.kind(), hit);
        if hit {
            tracing::debug!(kind = key.kind(), tier = %tier, "Cache hit");
        }
    }
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("tiers", &self.tier_order())
            .field("cache", &self.cache)
            .finish()
    }
}
