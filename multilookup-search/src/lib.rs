//! Search strategies for multilookup.
//!
//! Two strategies share the [`SearchStrategy`] contract:
//! - [`SimpleSearchStrategy`] loads the target collection once and filters
//!   locally by display value
//! - [`AdvancedSearchStrategy`] sends each query to the store's full-text
//!   search, and reuses a simple strategy for the pre-query list
//!
//! [`build_strategy`] picks one from a [`SearchMode`]. [`DebounceGate`]
//! throttles raw input before it reaches `search`.
//!
//! [`SearchMode`]: multilookup_types::SearchMode

mod advanced;
mod debounce;
mod factory;
mod simple;
mod strategy;

pub use advanced::AdvancedSearchStrategy;
pub use debounce::{DEFAULT_DEBOUNCE, DebounceGate, Debounced};
pub use factory::build_strategy;
pub use simple::SimpleSearchStrategy;
pub use strategy::SearchStrategy;
