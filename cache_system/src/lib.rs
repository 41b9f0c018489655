//! Cache system for per-type metadata
//!
//! This crate provides in-process, read-mostly caches keyed by `TypeId`,
//! used to memoize derived field tables and converter instances.

pub mod prelude;
pub mod stats;
pub mod type_cache;

pub use stats::CacheStats;
pub use type_cache::TypeCache;
