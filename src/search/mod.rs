//! Keystroke-driven city search.
//!
//! # Data Flow
//! ```text
//! on_input(text)
//!     → abort pending timer, start a new one (debounce)
//!     → timer fires: issue seq n, resolve cities
//!     → result arrives: apply only if n is still the latest seq
//!     → publish SearchSnapshot on the watch channel
//! ```
//!
//! # Design Decisions
//! - Last request wins, not last response
//! - Superseded queries are not aborted; their results are dropped on arrival

pub mod coordinator;
pub mod sequence;

pub use coordinator::{SearchCoordinator, SearchSnapshot};
pub use sequence::SequenceRegister;
