use crate::stats::{Counter, ShardStats};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// A single shard containing a HashMap protected by a read-write lock.
///
/// The table is only touched through [`Shard::read`] and [`Shard::write`],
/// which is where lock acquisitions get counted.
pub(crate) struct Shard<K, V> {
    map: RwLock<HashMap<K, Arc<V>>>,
    stats: ShardStats,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
{
    pub fn new(capacity: Option<usize>) -> Self {
        let map = match capacity {
            Some(capacity) => HashMap::with_capacity(capacity),
            None => HashMap::new(),
        };
        Self {
            map: RwLock::new(map),
            stats: ShardStats::new(),
        }
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Arc<V>>> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.map.read();
        #[cfg(feature = "lock-timing")]
        self.stats
            .add(Counter::LockWaitNanos, start.elapsed().as_nanos() as u64);
        self.stats.bump(Counter::SharedLock);
        guard
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Arc<V>>> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.map.write();
        #[cfg(feature = "lock-timing")]
        self.stats
            .add(Counter::LockWaitNanos, start.elapsed().as_nanos() as u64);
        self.stats.bump(Counter::ExclusiveLock);
        guard
    }

    /// Insert or overwrite.
    pub fn store(&self, key: K, value: V) {
        let mut map = self.write();
        map.insert(key, Arc::new(value));
        self.stats.bump(Counter::Write);
    }

    pub fn load<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let map = self.read();
        self.stats.bump(Counter::Read);
        map.get(key).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let map = self.read();
        self.stats.bump(Counter::Read);
        map.contains_key(key)
    }

    /// Return the stored value, or insert `value` if the key is absent.
    /// The flag is true when the value was already there.
    pub fn load_or_store(&self, key: K, value: V) -> (Arc<V>, bool) {
        // Fast path: the key is usually present already.
        {
            let map = self.read();
            if let Some(existing) = map.get(&key) {
                self.stats.bump(Counter::Read);
                self.stats.bump(Counter::FastPathHit);
                return (Arc::clone(existing), true);
            }
        }

        // Another writer may have inserted the key between the two locks, so
        // the lookup has to be repeated under the write lock.
        let mut map = self.write();
        match map.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.bump(Counter::Read);
                self.stats.bump(Counter::LostRace);
                (Arc::clone(entry.get()), true)
            }
            Entry::Vacant(entry) => {
                let value = Arc::new(value);
                entry.insert(Arc::clone(&value));
                self.stats.bump(Counter::Write);
                self.stats.bump(Counter::SlowPathInsert);
                (value, false)
            }
        }
    }

    /// Remove a key-value pair, returning the value if it existed.
    pub fn remove<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut map = self.write();
        let result = map.remove(key);
        if result.is_some() {
            self.stats.bump(Counter::Remove);
        }
        result
    }

    /// Visit every entry under the read lock. Returns false if `f` asked to stop.
    pub fn range<F>(&self, f: &mut F) -> bool
    where
        F: FnMut(&K, &Arc<V>) -> bool,
    {
        let map = self.read();
        for (key, value) in map.iter() {
            if !f(key, value) {
                return false;
            }
        }
        true
    }

    /// Clone out every entry under the read lock.
    pub fn collect_into(&self, out: &mut Vec<(K, Arc<V>)>)
    where
        K: Clone,
    {
        let map = self.read();
        out.reserve(map.len());
        out.extend(map.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
    }

    /// Get the number of entries in this shard.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if this shard is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get a snapshot of statistics for this shard.
    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }
}
