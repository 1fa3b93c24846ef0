//! 响应缓存模块：以请求 URL 为键，避免重复调用上游 API。
//!
//! # Response Caching Module
//!
//! Every upstream response is cached under a hash of its request URL for a
//! fixed TTL (one hour by default). The store itself belongs to the host and
//! is passed in as a [`CacheBackend`]; this module holds no global state.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheManager`] | Typed get/set with TTL, key prefix and statistics |
//! | [`CacheConfig`] | TTL, debug read-bypass and size limits |
//! | [`CacheBackend`] | Trait for host-provided key/value stores |
//! | [`MemoryCache`] | Bounded in-memory LRU store with lazy expiry |
//! | [`NullCache`] | No-op store for disabling caching |
//! | [`CacheKey`] | SHA-256 of the request URL |
//!
//! ## Example
//!
//! ```rust
//! use embed_wikimedia::cache::{CacheConfig, CacheManager, MemoryCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let backend = Arc::new(MemoryCache::new(1000));
//! let config = CacheConfig::new().with_ttl(Duration::from_secs(3600));
//! let cache = CacheManager::new(config, backend);
//! assert_eq!(cache.backend_name(), "memory");
//! ```
//!
//! Concurrent misses for the same key each fetch and the last write wins;
//! there is no single-flight de-duplication.

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, CachedResponse, MemoryCache, NullCache};
pub use key::CacheKey;
pub use manager::{CacheConfig, CacheManager, CacheStats, KEY_PREFIX};
