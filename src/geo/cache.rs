//! Session-scoped resolution cache.
//!
//! Entries are write-once: once a key holds a value it is never mutated or
//! evicted. A fresh lookup after restart builds a new cache rather than
//! touching an existing entry. There is no TTL.
//!
//! Each key owns a `OnceCell`, so concurrent resolutions of the same key share
//! a single provider round-trip: the first caller runs the tier chain and
//! everyone else awaits its result.

use dashmap::DashMap;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::OnceCell;

use crate::geo::types::{City, Country, CountryInfo, Tier};

/// What was looked up, and with which parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheKey {
    Countries,
    /// `prefix` is the folded leading characters of the query.
    Cities { country: String, prefix: String },
    /// `city` is the folded city name.
    PostalCodes { country: String, city: String },
    CountryInfo { country: String },
}

impl CacheKey {
    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::Countries => "countries",
            CacheKey::Cities { .. } => "cities",
            CacheKey::PostalCodes { .. } => "postal_codes",
            CacheKey::CountryInfo { .. } => "country_info",
        }
    }
}

/// An immutable cached result.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<T> {
    pub key: CacheKey,
    pub value: T,
    /// Tier that produced the value.
    pub tier: Tier,
    pub inserted_at: SystemTime,
}

type Slot<T> = Arc<OnceCell<Arc<CacheEntry<T>>>>;

/// Write-once map for one kind of lookup.
pub struct EntryStore<T> {
    slots: DashMap<CacheKey, Slot<T>>,
}

impl<T> Default for EntryStore<T> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<T> EntryStore<T> {
    fn slot(&self, key: &CacheKey) -> Slot<T> {
        // Clone the Arc out so no shard lock is held across an await.
        self.slots.entry(key.clone()).or_default().clone()
    }

    /// The entry for `key`, if resolved.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry<T>>> {
        self.slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Store a value unless the key already holds one. Returns the entry that
    /// ends up in the cache.
    pub fn insert(&self, key: CacheKey, value: T, tier: Tier) -> Arc<CacheEntry<T>> {
        let slot = self.slot(&key);
        let entry = Arc::new(CacheEntry {
            key,
            value,
            tier,
            inserted_at: SystemTime::now(),
        });
        match slot.set(entry.clone()) {
            Ok(()) => entry,
            Err(_) => slot.get().cloned().unwrap_or(entry),
        }
    }

    /// Return the cached entry, or run `resolve` once to create it.
    ///
    /// The boolean is true when the value was already present.
    pub async fn get_or_resolve<F, Fut>(&self, key: CacheKey, resolve: F) -> (Arc<CacheEntry<T>>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = (T, Tier)>,
    {
        let slot = self.slot(&key);
        if let Some(entry) = slot.get() {
            return (entry.clone(), true);
        }
        let entry = slot
            .get_or_init(|| async move {
                let (value, tier) = resolve().await;
                Arc::new(CacheEntry {
                    key,
                    value,
                    tier,
                    inserted_at: SystemTime::now(),
                })
            })
            .await;
        (entry.clone(), false)
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All cached lookups for one checkout session.
#[derive(Default)]
pub struct ResolutionCache {
    countries: EntryStore<Vec<Country>>,
    cities: EntryStore<Vec<City>>,
    postal_codes: EntryStore<Vec<String>>,
    country_info: EntryStore<CountryInfo>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> &EntryStore<Vec<Country>> {
        &self.countries
    }

    pub fn cities(&self) -> &EntryStore<Vec<City>> {
        &self.cities
    }

    pub fn postal_codes(&self) -> &EntryStore<Vec<String>> {
        &self.postal_codes
    }

    pub fn country_info(&self) -> &EntryStore<CountryInfo> {
        &self.country_info
    }

    /// Resolved entry counts as (countries, cities, postal codes, country info).
    pub fn summary(&self) -> (usize, usize, usize, usize) {
        (
            self.countries.len(),
            self.cities.len(),
            self.postal_codes.len(),
            self.country_info.len(),
        )
    }
}

impl std::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (countries, cities, postal, info) = self.summary();
        f.debug_struct("ResolutionCache")
            .field("countries", &countries)
            .field("cities", &cities)
            .field("postal_codes", &postal)
            .field("country_info", &info)
            .finish()
    }
}
