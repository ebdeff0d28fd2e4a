//! Envelope cache with TTL and staleness for Questline.
//!
//! Payloads are wrapped in a [`CacheEnvelope`] that records when they were stored and
//! which schema wrote them. A [`Cache`] reads and writes envelopes through any
//! [`CacheStore`] backend, addressed by namespace and key.
//!
//! # Guarantees
//!
//! - An envelope older than its namespace's TTL is never returned (and is removed).
//! - A corrupt, unparseable, or wrong-schema entry reads as absent and its slot is cleared.
//! - Reads and writes never fail the caller; store failures are logged.
//!
//! There is no locking. Concurrent writers to the same key race and the last write wins,
//! which is fine because every payload is a whole snapshot.
//!
//! # Example
//!
//! ```rust
//! use questline_cache::{Cache, MemoryCacheStore};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let cache = Cache::new(Arc::new(MemoryCacheStore::new()));
//! cache.write("player-cache", "zezima", &vec![1, 2, 3]).await;
//!
//! let envelope = cache.read::<Vec<u32>>("player-cache", "zezima").await.unwrap();
//! assert_eq!(envelope.payload, vec![1, 2, 3]);
//! assert!(!cache.is_stale("player-cache", &envelope));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod envelope;
mod filesystem;
mod memory;
mod policy;
mod store;

pub use cache::Cache;
pub use envelope::{CacheEnvelope, SCHEMA_VERSION};
pub use filesystem::FileCacheStore;
pub use memory::MemoryCacheStore;
pub use policy::CachePolicy;
pub use store::{CacheResult, CacheStore};
