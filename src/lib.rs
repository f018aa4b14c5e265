//! # shardedmap
//!
//! A concurrent map that spreads its entries over independently locked shards.
//!
//! One lock around one map serializes every writer, even writers touching
//! unrelated keys. `ShardedMap` routes each key to one of a fixed number of
//! shards, each a `HashMap` behind its own read-write lock, so unrelated keys
//! rarely contend. No operation ever holds more than one shard lock.
//!
//! ## Key kinds
//!
//! - strings and byte vectors, routed by hashing their bytes ([`StrMap`])
//! - `u64` integers, routed by `key % shard_count` ([`Uint64Map`])
//! - 128-bit identifiers, routed by hashing their 16 bytes ([`UuidMap`])
//!
//! All three are the same generic [`ShardedMap`]; see [`ShardKey`] to add
//! another kind.
//!
//! ## Example
//!
//! ```rust
//! use shardedmap::StrMap;
//!
//! let map = StrMap::new();
//!
//! map.store("key1".to_string(), "value1");
//! assert_eq!(*map.load("key1").unwrap(), "value1");
//!
//! // Only the first writer for a key wins
//! let (actual, loaded) = map.load_or_store("key1".to_string(), "other");
//! assert!(loaded);
//! assert_eq!(*actual, "value1");
//!
//! map.range(|key, value| {
//!     println!("{}: {}", key, value);
//!     true
//! });
//!
//! map.delete("key1");
//! assert!(map.load("key1").is_none());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shardedmap::{HashFunction, ShardedMapBuilder};
//!
//! let map = ShardedMapBuilder::new()
//!     .shard_count(64)?  // Must be a power of two; <= 0 means the default
//!     .hash_function(HashFunction::AHash)
//!     .capacity_per_shard(128)
//!     .build::<String, i32>();
//! assert_eq!(map.shard_count(), 64);
//! # Ok::<(), shardedmap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Hash function used for shard routing.
pub mod hash;
/// Iterator implementations.
pub mod iter;
pub mod key;
mod shard;
/// Main ShardedMap implementation.
pub mod sharded_map;
/// Statistics and diagnostics.
pub mod stats;

pub use config::{Config, HashFunction, ShardedMapBuilder, DEFAULT_SHARD_COUNT};
pub use error::Error;
pub use hash::ShardHasher;
pub use iter::SnapshotIter;
pub use key::ShardKey;
pub use uuid::Uuid;
pub use sharded_map::{ShardedMap, StrMap, Uint64Map, UuidMap};
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
