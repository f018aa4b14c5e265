use crate::config::{create_hasher, Config};
use crate::error::Error;
use crate::hash::ShardHasher;
use crate::iter::SnapshotIter;
use crate::key::ShardKey;
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
use std::borrow::Borrow;
use std::sync::Arc;
use uuid::Uuid;

/// Concurrent map split over independently locked shards.
///
/// Every key belongs to exactly one shard, chosen by [`shard_index`]. Each
/// operation locks only that shard, so operations on different shards never
/// wait for each other. Values are stored behind `Arc<V>` and handed out
/// without copying.
///
/// The shard count is fixed at construction and is always a power of two.
///
/// [`shard_index`]: ShardedMap::shard_index
///
/// # Example
///
/// ```rust
/// use shardedmap::ShardedMap;
///
/// let map = ShardedMap::new();
/// map.store("key1".to_string(), "value1");
///
/// if let Some(value) = map.load("key1") {
///     println!("Found: {}", *value);
/// }
/// ```
pub struct ShardedMap<K, V> {
    shards: Box<[Shard<K, V>]>,
    shard_mask: usize,
    hasher: ShardHasher,
}

/// Map keyed by strings.
pub type StrMap<V> = ShardedMap<String, V>;
/// Map keyed by unsigned 64-bit integers.
pub type Uint64Map<V> = ShardedMap<u64, V>;
/// Map keyed by 128-bit identifiers.
pub type UuidMap<V> = ShardedMap<Uuid, V>;

impl<K, V> ShardedMap<K, V>
where
    K: ShardKey + Send + Sync,
    V: Send + Sync,
{
    /// Create a new map with defaults (32 shards, ahash).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a map with `shard_count` shards.
    ///
    /// Zero or a negative count selects the default of 32. A positive count
    /// that is not a power of two is rejected.
    ///
    /// ```rust
    /// use shardedmap::{Error, Uint64Map};
    ///
    /// let map: Uint64Map<&str> = Uint64Map::with_shard_count(0)?;
    /// assert_eq!(map.shard_count(), 32);
    ///
    /// assert!(matches!(
    ///     Uint64Map::<&str>::with_shard_count(12),
    ///     Err(Error::InvalidShardCount(12))
    /// ));
    /// # Ok::<(), shardedmap::Error>(())
    /// ```
    pub fn with_shard_count(shard_count: i64) -> Result<Self, Error> {
        Ok(Self::with_config(Config::new().shard_count(shard_count)?))
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Self {
        let shard_count = config.shard_count;
        let shards: Box<[Shard<K, V>]> = (0..shard_count)
            .map(|_| Shard::new(config.capacity_per_shard))
            .collect();

        tracing::debug!(
            shard_count,
            hash_function = ?config.hash_function,
            "created sharded map"
        );

        Self {
            shards,
            shard_mask: shard_count - 1,
            hasher: create_hasher(config.hash_function),
        }
    }

    /// Index of the shard that owns `key`.
    ///
    /// Pure function of the key and the shard count. Integer keys land in
    /// `key % shard_count`; everything else is hashed first.
    #[inline]
    pub fn shard_index<Q>(&self, key: &Q) -> usize
    where
        Q: ShardKey + ?Sized,
    {
        (key.route_hash(&self.hasher) as usize) & self.shard_mask
    }

    #[inline]
    fn shard_for<Q>(&self, key: &Q) -> &Shard<K, V>
    where
        Q: ShardKey + ?Sized,
    {
        &self.shards[self.shard_index(key)]
    }

    /// Number of shards, fixed for the life of the map.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Insert a value, replacing whatever was stored under `key`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::StrMap;
    ///
    /// let map = StrMap::new();
    /// map.store("key".to_string(), 1);
    /// map.store("key".to_string(), 2);
    /// assert_eq!(*map.load("key").unwrap(), 2);
    /// ```
    pub fn store(&self, key: K, value: V) {
        self.shard_for(&key).store(key, value)
    }

    /// Get the value stored under `key`, if any.
    ///
    /// Takes only the shard's read lock, so concurrent loads on one shard
    /// don't wait for each other.
    pub fn load<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: ShardKey + ?Sized,
    {
        self.shard_for(key).load(key)
    }

    /// Check whether `key` is present without cloning its value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ShardKey + ?Sized,
    {
        self.shard_for(key).contains_key(key)
    }

    /// Return the existing value for `key`, or store `value` if there is none.
    ///
    /// The flag is `true` when the key was already present, in which case the
    /// map is left untouched and `value` is dropped. Of several concurrent
    /// callers racing on one absent key, exactly one gets `false`; the rest
    /// get `true` and the winner's value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::Uint64Map;
    ///
    /// let map = Uint64Map::new();
    /// let (value, loaded) = map.load_or_store(7, "first");
    /// assert_eq!((*value, loaded), ("first", false));
    ///
    /// let (value, loaded) = map.load_or_store(7, "second");
    /// assert_eq!((*value, loaded), ("first", true));
    /// ```
    pub fn load_or_store(&self, key: K, value: V) -> (Arc<V>, bool) {
        self.shard_for(&key).load_or_store(key, value)
    }

    /// Remove `key` if present. Removing a missing key is a no-op.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ShardKey + ?Sized,
    {
        self.shard_for(key).remove(key);
    }

    /// Remove `key` and return the value it held.
    pub fn load_and_delete<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: ShardKey + ?Sized,
    {
        self.shard_for(key).remove(key)
    }

    /// Call `f` for every entry until it returns `false`.
    ///
    /// Shards are visited in index order, each under its own read lock, one
    /// at a time. Order within a shard is unspecified. No key is visited
    /// twice, but the walk is not a snapshot of the whole map: entries stored
    /// concurrently may or may not show up, and a concurrently replaced value
    /// may appear in either its old or new version.
    ///
    /// `f` runs while a shard read lock is held. Calling back into the map
    /// from `f` to write can deadlock.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::Uint64Map;
    ///
    /// let map = Uint64Map::new();
    /// for i in 0..10 {
    ///     map.store(i, i * 2);
    /// }
    ///
    /// let mut sum = 0;
    /// map.range(|_, value| {
    ///     sum += **value;
    ///     true
    /// });
    /// assert_eq!(sum, 90);
    /// ```
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &Arc<V>) -> bool,
    {
        for (index, shard) in self.shards.iter().enumerate() {
            if !shard.range(&mut f) {
                tracing::trace!(shard = index, "range stopped by visitor");
                return;
            }
        }
    }

    /// Copy every entry out, shard by shard, and iterate over the copies.
    ///
    /// Same consistency as [`range`](ShardedMap::range), but no lock is held
    /// while the caller consumes the iterator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::StrMap;
    ///
    /// let map = StrMap::new();
    /// map.store("key1".to_string(), "value1");
    /// map.store("key2".to_string(), "value2");
    ///
    /// assert_eq!(map.iter_snapshot().count(), 2);
    /// ```
    pub fn iter_snapshot(&self) -> SnapshotIter<K, V>
    where
        K: Clone,
    {
        SnapshotIter::new(&self.shards)
    }

    /// Get the total number of entries across all shards.
    ///
    /// Shards are counted one at a time, so under concurrent writes the
    /// result is approximate.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Entry count of each shard, in shard order.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Get sizes and operation counters for every shard.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();
        let size = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Summarize how evenly entries and traffic are spread over the shards.
    pub fn diagnostics(&self) -> Diagnostics {
        let shards = self
            .shards
            .iter()
            .map(|shard| ShardDiagnostics {
                entries: shard.len(),
                ops: shard.stats(),
            })
            .collect();
        Diagnostics::from_shards(shards)
    }
}

impl<K, V> Default for ShardedMap<K, V>
where
    K: ShardKey + Send + Sync,
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shard_scenario() {
        let map: StrMap<i32> = ShardedMap::with_shard_count(1).unwrap();
        map.store("a".to_string(), 1);
        map.store("b".to_string(), 2);
        assert_eq!(*map.load("a").unwrap(), 1);

        let mut seen = Vec::new();
        map.range(|k, v| {
            seen.push((k.clone(), **v));
            true
        });
        seen.sort();
        assert_eq!(seen, vec![("a".to_string(), 1), ("b".to_string(), 2)]);

        map.delete("a");
        assert!(map.load("a").is_none());
        assert_eq!(*map.load("b").unwrap(), 2);
    }

    #[test]
    fn test_range_visits_shards_in_order() {
        let map: Uint64Map<()> = ShardedMap::with_shard_count(4).unwrap();
        for i in 0..40 {
            map.store(i, ());
        }

        let mut shards_seen = Vec::new();
        map.range(|k, _| {
            shards_seen.push(map.shard_index(k));
            true
        });
        assert_eq!(shards_seen.len(), 40);
        assert!(shards_seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_range_stop_skips_remaining_shards() {
        let map: Uint64Map<u64> = ShardedMap::with_shard_count(8).unwrap();
        for i in 0..64 {
            map.store(i, i);
        }

        let mut visited = 0;
        map.range(|_, _| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_load_and_delete() {
        let map: UuidMap<&str> = ShardedMap::new();
        let id = Uuid::from_u128(99);
        map.store(id, "x");
        assert_eq!(*map.load_and_delete(&id).unwrap(), "x");
        assert!(map.load_and_delete(&id).is_none());
        assert!(!map.contains_key(&id));
    }

    #[test]
    fn test_diagnostics_counts_entries() {
        let map: Uint64Map<u64> = ShardedMap::with_shard_count(4).unwrap();
        for i in 0..8 {
            map.store(i, i);
        }
        let diag = map.diagnostics();
        assert_eq!(diag.total_entries, 8);
        assert_eq!(diag.shards.len(), 4);
        assert_eq!(diag.avg_load_per_shard, 2.0);
        assert_eq!(diag.max_load_ratio, 1.0);
    }
}
