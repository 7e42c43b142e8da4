//! Checkout address resolution and field validation.
//!
//! Resolves countries, cities and postal codes from unreliable remote sources
//! through a tiered fallback chain with a session cache, and validates
//! checkout fields (address, postal code, payment card) synchronously.

pub mod config;
pub mod geo;
pub mod observability;
pub mod resilience;
pub mod search;
pub mod session;
pub mod validation;

pub use config::CheckoutConfig;
pub use geo::GeoResolver;
pub use search::SearchCoordinator;
pub use session::{CheckoutSession, SessionError};
pub use validation::ValidationEngine;
