//! Checkout field validation.
//!
//! # Data Flow
//! ```text
//! (field, value, form snapshot)
//!     → rules.rs (look up the field's rule)
//!     → required check (empty → generic message)
//!     → matcher: pattern | postal.rs | card.rs | expiry.rs
//!     → FieldSnapshot { valid, message }
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous; depends only on the value and named siblings
//! - Failures are data, never errors
//! - Unmapped countries get a permissive postal pattern, covered by tests

pub mod card;
pub mod engine;
pub mod expiry;
pub mod postal;
pub mod rules;

pub use card::CardBrand;
pub use engine::{FieldSnapshot, FormSnapshot, ValidationEngine};
pub use expiry::Clock;
pub use rules::{FieldId, ValidationRule, REQUIRED_MESSAGE};
