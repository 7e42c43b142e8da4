//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CheckoutConfig (validated, immutable)
//!     → handed to CheckoutSession at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a session keeps the values it started with
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::CheckoutConfig;
pub use schema::{
    CircuitBreakerConfig, ObservabilityConfig, PostalConfig, ProvidersConfig,
    RichProviderConfig, SearchConfig, SimpleProviderConfig,
};
