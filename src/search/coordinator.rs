//! Debounced city search with latest-wins ordering.
//!
//! # Responsibilities
//! - Hold back queries until typing has settled for the debounce period
//! - Tag each issued query with a sequence number and drop stale results
//! - Reset dependent fields when the country changes
//! - Publish the visible state through a watch channel

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::geo::types::{normalize_code, City};
use crate::geo::GeoResolver;
use crate::observability::metrics;
use crate::search::sequence::SequenceRegister;

/// What the checkout form currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub country: String,
    /// Text in the city field.
    pub query: String,
    pub suggestions: Vec<City>,
    /// Selected city name.
    pub city: Option<String>,
    pub postal_codes: Vec<String>,
    /// Latest sequence number issued when this snapshot was published.
    pub seq: u64,
}

struct SearchState {
    register: SequenceRegister,
    snapshot: SearchSnapshot,
}

struct Inner {
    resolver: Arc<GeoResolver>,
    debounce: Duration,
    min_query_len: usize,
    state: Mutex<SearchState>,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: watch::Sender<SearchSnapshot>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &mut SearchState) {
        state.snapshot.seq = state.register.latest();
        self.tx.send_replace(state.snapshot.clone());
    }

    fn cancel_pending(&self) {
        let handle = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Issue a sequence number for a settled query, unless the form moved on
    /// (another country, different text) while the timer was running.
    fn begin_query(&self, country: &str, query: &str) -> Option<u64> {
        let mut state = self.state();
        if state.snapshot.country != country || state.snapshot.query.trim() != query {
            return None;
        }
        Some(state.register.issue())
    }

    async fn run_query(self: Arc<Self>, seq: u64, country: String, query: String) {
        tracing::debug!(seq, country = %country, query = %query, "Issuing city search");

        let cities = self.resolver.resolve_cities(&country, &query).await;

        let mut state = self.state();
        if !state.register.is_current(seq) {
            tracing::debug!(seq, latest = state.register.latest(), "Discarding stale city results");
            metrics::record_result_discarded("cities");
            return;
        }
        state.snapshot.suggestions = cities;
        self.publish(&mut state);
    }
}

/// Turns city-field keystrokes into suggestion lists.
///
/// Must be used from within a tokio runtime.
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

impl SearchCoordinator {
    pub fn new(resolver: Arc<GeoResolver>) -> Self {
        let search = resolver.search_config();
        let debounce = Duration::from_millis(search.debounce_ms);
        let min_query_len = search.min_query_len;
        let (tx, _rx) = watch::channel(SearchSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                resolver,
                debounce,
                min_query_len,
                state: Mutex::new(SearchState {
                    register: SequenceRegister::new(),
                    snapshot: SearchSnapshot::default(),
                }),
                pending: Mutex::new(None),
                tx,
            }),
        }
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.tx.subscribe()
    }

    /// The currently visible state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.tx.borrow().clone()
    }

    /// Change the country. Clears city, postal codes and suggestions, and
    /// invalidates any search still in flight for the previous country.
    pub fn select_country(&self, country_code: &str) {
        self.inner.cancel_pending();
        let mut state = self.inner.state();
        state.register.invalidate();
        state.snapshot.country = normalize_code(country_code);
        state.snapshot.query.clear();
        state.snapshot.suggestions.clear();
        state.snapshot.city = None;
        state.snapshot.postal_codes.clear();
        self.inner.publish(&mut state);
        tracing::debug!(country = %state.snapshot.country, "Country changed");
    }

    /// Handle new text in the city field.
    pub fn on_input(&self, text: &str) {
        self.inner.cancel_pending();
        let query = text.trim().to_string();

        let country = {
            let mut state = self.inner.state();
            state.snapshot.query = text.to_string();
            if query.chars().count() < self.inner.min_query_len {
                state.register.invalidate();
                state.snapshot.suggestions.clear();
            }
            self.inner.publish(&mut state);
            state.snapshot.country.clone()
        };
        if query.chars().count() < self.inner.min_query_len {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let debounce = self.inner.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Detached: a later keystroke cancels the timer, never the query.
            if let Some(seq) = inner.begin_query(&country, &query) {
                tokio::spawn(inner.run_query(seq, country, query));
            }
        });
        *self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(timer);
    }

    /// Pick a city and load its postal codes.
    ///
    /// Returns false if the codes arrived after a newer request superseded
    /// this one and were dropped.
    pub async fn select_city(&self, city_name: &str) -> bool {
        self.inner.cancel_pending();
        let (seq, country) = {
            let mut state = self.inner.state();
            let seq = state.register.issue();
            state.snapshot.query = city_name.to_string();
            state.snapshot.city = Some(city_name.to_string());
            state.snapshot.suggestions.clear();
            state.snapshot.postal_codes.clear();
            self.inner.publish(&mut state);
            (seq, state.snapshot.country.clone())
        };

        let codes = self.inner.resolver.resolve_postal_codes(&country, city_name).await;

        let mut state = self.inner.state();
        if !state.register.is_current(seq) {
            tracing::debug!(seq, "Discarding stale postal codes");
            metrics::record_result_discarded("postal_codes");
            return false;
        }
        state.snapshot.postal_codes = codes;
        self.inner.publish(&mut state);
        true
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.inner.cancel_pending();
    }
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("debounce", &self.inner.debounce)
            .field("min_query_len", &self.inner.min_query_len)
            .finish()
    }
}
