//! Geo reference data: countries, cities and postal codes.
//!
//! # Data Flow
//! ```text
//! lookup (kind, params)
//!     → cache.rs (hit → return)
//!     → resolver.rs: rich tier → simple tier (deadline + breaker each)
//!     → providers/embedded.rs (total)
//!     → postal.rs (synthesized postal codes, last resort)
//!     → cache.rs (store first success, write-once)
//! ```
//!
//! # Design Decisions
//! - The cache is an explicit object owned by the checkout session
//! - Providers normalize into canonical records before the resolver sees them
//! - Resolution never fails; the worst case is static or synthesized data

pub mod cache;
pub mod postal;
pub mod providers;
pub mod resolver;
pub mod types;

pub use cache::{CacheEntry, CacheKey, ResolutionCache};
pub use providers::{GeoProvider, RichRemoteProvider, SimpleRemoteProvider, StaticProvider, TotalProvider};
pub use resolver::GeoResolver;
pub use types::{City, Coordinates, Country, CountryInfo, ProviderError, ProviderResult, Tier};
