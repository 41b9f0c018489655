//! Convenience re-exports for common cache-system usage

pub use crate::stats::CacheStats;
pub use crate::type_cache::TypeCache;

pub use std::any::TypeId;
pub use std::sync::Arc;
