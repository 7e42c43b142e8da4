//! Geo data providers.
//!
//! # Tiers
//! ```text
//! rich.rs      GeoNames-style API   (regions, population, postal codes)
//!     ↓ ProviderError
//! simple.rs    REST Countries + CountriesNow   (names and flags only)
//!     ↓ ProviderError
//! embedded.rs  compiled-in dataset  (total, never fails)
//! ```
//!
//! # Design Decisions
//! - Every adapter translates its raw response shape into the canonical
//!   `Country`/`City` records, so the resolver's fallback loop never sees
//!   provider-specific types
//! - The static tier implements `TotalProvider`, whose methods cannot fail;
//!   the resolver's last step therefore has no error path

pub mod dataset;
pub mod embedded;
pub mod rich;
pub mod simple;

use async_trait::async_trait;

use crate::geo::types::{City, Country, CountryInfo, ProviderResult, Tier};

pub use embedded::StaticProvider;
pub use rich::RichRemoteProvider;
pub use simple::SimpleRemoteProvider;

/// A fallible geo data source.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Which tier this provider occupies.
    fn tier(&self) -> Tier;

    async fn list_countries(&self) -> ProviderResult<Vec<Country>>;

    /// Cities in `country_code` whose name starts with `prefix`.
    async fn search_cities(
        &self,
        country_code: &str,
        prefix: &str,
        limit: usize,
    ) -> ProviderResult<Vec<City>>;

    /// Known postal codes for a city. An empty list is a valid answer.
    async fn postal_codes_for_city(
        &self,
        country_code: &str,
        city_name: &str,
    ) -> ProviderResult<Vec<String>>;

    async fn country_info(&self, country_code: &str) -> ProviderResult<CountryInfo>;
}

/// A geo data source defined for every input.
pub trait TotalProvider: Send + Sync {
    fn list_countries(&self) -> Vec<Country>;
    fn search_cities(&self, country_code: &str, prefix: &str, limit: usize) -> Vec<City>;
    fn postal_codes_for_city(&self, country_code: &str, city_name: &str) -> Vec<String>;
    fn country_info(&self, country_code: &str) -> CountryInfo;
}

/// Remove duplicate codes (first occurrence wins) and sort by display name.
pub(crate) fn dedupe_countries(mut countries: Vec<Country>) -> Vec<Country> {
    let mut seen = std::collections::HashSet::new();
    countries.retain(|c| !c.code.is_empty() && seen.insert(c.code.clone()));
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    countries
}
