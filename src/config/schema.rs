//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the checkout
//! geo pipeline. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Remote geo data sources.
    pub providers: ProvidersConfig,

    /// Keystroke-driven city search.
    pub search: SearchConfig,

    /// Postal code synthesis.
    pub postal: PostalConfig,

    /// Per-tier circuit breaker.
    pub resilience: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote tiers, in preference order.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub rich: RichProviderConfig,
    pub simple: SimpleProviderConfig,
}

/// GeoNames-style service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RichProviderConfig {
    /// Enable this tier.
    pub enabled: bool,

    /// Service root (e.g., "http://api.geonames.org").
    pub base_url: String,

    /// Account name sent with every request.
    pub username: String,

    /// Per-call deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RichProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://api.geonames.org".to_string(),
            username: "demo".to_string(),
            timeout_ms: 2_000,
        }
    }
}

/// REST Countries + CountriesNow services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimpleProviderConfig {
    /// Enable this tier.
    pub enabled: bool,

    /// Country metadata root (e.g., "https://restcountries.com/v3.1").
    pub countries_url: String,

    /// City names root (e.g., "https://countriesnow.space/api/v0.1").
    pub cities_url: String,

    /// Per-call deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SimpleProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            countries_url: "https://restcountries.com/v3.1".to_string(),
            cities_url: "https://countriesnow.space/api/v0.1".to_string(),
            timeout_ms: 2_000,
        }
    }
}

/// City search behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query fires.
    pub debounce_ms: u64,

    /// Shorter input clears suggestions without querying.
    pub min_query_len: usize,

    /// Maximum suggestions returned.
    pub city_limit: usize,

    /// Characters of the query used as the city cache key.
    pub cache_prefix_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            city_limit: 10,
            cache_prefix_len: 3,
        }
    }
}

/// Postal code synthesis for cities no tier knows codes for.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PostalConfig {
    /// Number of codes generated per city.
    pub synthesized_count: usize,
}

impl Default for PostalConfig {
    fn default() -> Self {
        Self { synthesized_count: 5 }
    }
}

/// Circuit breaker shared by all remote tiers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Enable the breaker. When disabled every call reaches the tier.
    pub enabled: bool,

    /// Consecutive failures before a tier is skipped.
    pub failure_threshold: u32,

    /// Seconds a tripped tier is skipped before a probe is allowed.
    pub cooldown_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            failure_threshold: 3,
            cooldown_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
