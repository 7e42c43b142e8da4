//! Metrics collection.
//!
//! # Metrics
//! - `geo_provider_calls_total` (counter): tier calls by tier, outcome
//! - `geo_cache_lookups_total` (counter): cache lookups by kind, result
//! - `geo_postal_synthesized_total` (counter): synthesized postal lists by country
//! - `search_results_discarded_total` (counter): stale results dropped
//!
//! # Design Decisions
//! - Labels are static strings or short country codes to bound cardinality

use metrics::counter;

use crate::geo::types::Tier;

/// Record a single tier call.
pub fn record_provider_call(tier: Tier, outcome: &'static str) {
    counter!("geo_provider_calls_total", "tier" => tier.as_str(), "outcome" => outcome).increment(1);
}

/// Record a cache lookup.
pub fn record_cache_lookup(kind: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("geo_cache_lookups_total", "kind" => kind, "result" => result).increment(1);
}

/// Record a synthesized postal list.
pub fn record_postal_synthesized(country: &str) {
    counter!("geo_postal_synthesized_total", "country" => country.to_string()).increment(1);
}

/// Record a search result dropped by the latest-wins guard.
pub fn record_result_discarded(kind: &'static str) {
    counter!("search_results_discarded_total", "kind" => kind).increment(1);
}
