//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver, search coordinator and session produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or config level)
//!     → any metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (tier, country, prefix, seq) on every event
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
