//! Indicator data aggregation layer.
//!
//! Sits between the World Bank client and the presentation glue:
//! resolves the selectable country universe, fetches indicator tables
//! through a TTL cache, and pairs tables for correlation views. All
//! upstream failures are absorbed at this layer's boundary, so callers
//! always receive a usable (possibly empty or fallback) value.

pub mod cache;
pub mod hub;
pub mod join;
pub mod scope;

pub use cache::TtlCache;
pub use hub::DataHub;
pub use join::join_at_year;
pub use scope::ScopeFilter;
