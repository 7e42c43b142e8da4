//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a remote tier:
//!     → circuit_breaker.rs (skip the tier while it is known to be down)
//!     → timeouts.rs (enforce the tier deadline)
//!     → outcome fed back into the breaker
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every remote call has a deadline
//! - No retries: the next tier is the retry
//! - A tripped breaker turns a slow failure into an instant fall-through

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use timeouts::with_deadline;
