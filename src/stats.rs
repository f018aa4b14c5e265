//! Statistics and diagnostics types.

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-shard operation counters.
///
/// All fields stay zero unless the `metrics` feature is enabled;
/// `lock_wait_nanos` additionally needs `lock-timing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardOps {
    /// Lookups answered by this shard (load, contains_key, load_or_store
    /// finding the key).
    pub reads: u64,
    /// Inserts and overwrites on this shard.
    pub writes: u64,
    /// Entries removed from this shard.
    pub removes: u64,
    /// load_or_store calls answered under the shared lock alone.
    pub fast_path_hits: u64,
    /// load_or_store calls that took the exclusive lock and inserted.
    pub slow_path_inserts: u64,
    /// load_or_store calls that took the exclusive lock and found the key
    /// already inserted by another caller.
    pub lost_races: u64,
    /// Shared (read) lock acquisitions.
    pub shared_acquisitions: u64,
    /// Exclusive (write) lock acquisitions.
    pub exclusive_acquisitions: u64,
    /// Cumulative lock wait time in nanoseconds.
    pub lock_wait_nanos: u64,
}

impl ShardOps {
    /// Reads, writes and removes combined.
    pub fn total(&self) -> u64 {
        self.reads + self.writes + self.removes
    }

    /// Shared and exclusive acquisitions combined.
    pub fn lock_acquisitions(&self) -> u64 {
        self.shared_acquisitions + self.exclusive_acquisitions
    }

    /// Share of load_or_store calls that never needed the exclusive lock.
    /// `None` before the first call.
    pub fn fast_path_ratio(&self) -> Option<f64> {
        let calls = self.fast_path_hits + self.slow_path_inserts + self.lost_races;
        (calls > 0).then(|| self.fast_path_hits as f64 / calls as f64)
    }
}

/// Events a shard counts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Counter {
    Read,
    Write,
    Remove,
    FastPathHit,
    SlowPathInsert,
    LostRace,
    SharedLock,
    ExclusiveLock,
    #[cfg_attr(not(feature = "lock-timing"), allow(dead_code))]
    LockWaitNanos,
}

#[cfg(feature = "metrics")]
const COUNTERS: usize = Counter::LockWaitNanos as usize + 1;

/// One relaxed atomic per [`Counter`].
#[cfg(feature = "metrics")]
pub(crate) struct ShardStats {
    counters: [AtomicU64; COUNTERS],
}

#[cfg(feature = "metrics")]
impl ShardStats {
    pub fn new() -> Self {
        Self {
            counters: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    #[inline]
    pub fn add(&self, counter: Counter, n: u64) {
        self.counters[counter as usize].fetch_add(n, Ordering::Relaxed);
    }

    fn get(&self, counter: Counter) -> u64 {
        self.counters[counter as usize].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ShardOps {
        ShardOps {
            reads: self.get(Counter::Read),
            writes: self.get(Counter::Write),
            removes: self.get(Counter::Remove),
            fast_path_hits: self.get(Counter::FastPathHit),
            slow_path_inserts: self.get(Counter::SlowPathInsert),
            lost_races: self.get(Counter::LostRace),
            shared_acquisitions: self.get(Counter::SharedLock),
            exclusive_acquisitions: self.get(Counter::ExclusiveLock),
            lock_wait_nanos: self.get(Counter::LockWaitNanos),
        }
    }
}

/// Counting compiles away without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
pub(crate) struct ShardStats;

#[cfg(not(feature = "metrics"))]
impl ShardStats {
    pub fn new() -> Self {
        ShardStats
    }

    #[inline]
    pub fn add(&self, _counter: Counter, _n: u64) {}

    pub fn snapshot(&self) -> ShardOps {
        ShardOps::default()
    }
}

impl ShardStats {
    #[inline]
    pub fn bump(&self, counter: Counter) {
        self.add(counter, 1);
    }
}

/// Aggregate statistics for a ShardedMap instance.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Total number of entries across all shards.
    pub size: usize,
    /// Number of entries in each shard, in shard order.
    pub shard_sizes: Vec<usize>,
    /// Operation counts for each shard, in shard order.
    pub operations: Vec<ShardOps>,
}

/// Per-shard diagnostics snapshot.
#[derive(Debug, Clone)]
pub struct ShardDiagnostics {
    /// Number of entries in this shard.
    pub entries: usize,
    /// Operation counters (all zero when metrics disabled).
    pub ops: ShardOps,
}

/// Structured snapshot for load-balance introspection.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Total number of entries across all shards.
    pub total_entries: usize,
    /// Per-shard diagnostics.
    pub shards: Vec<ShardDiagnostics>,
    /// Total read + write + remove operations (0 when metrics disabled).
    pub total_operations: u64,
    /// Average load (entries) per shard.
    pub avg_load_per_shard: f64,
    /// Max load / avg load ratio; 0.0 for an empty map.
    pub max_load_ratio: f64,
}

impl Diagnostics {
    pub(crate) fn from_shards(shards: Vec<ShardDiagnostics>) -> Self {
        let total_entries: usize = shards.iter().map(|s| s.entries).sum();
        let total_operations: u64 = shards.iter().map(|s| s.ops.total()).sum();
        let max_entries = shards.iter().map(|s| s.entries).max().unwrap_or(0);
        let avg_load_per_shard = if shards.is_empty() {
            0.0
        } else {
            total_entries as f64 / shards.len() as f64
        };
        let max_load_ratio = if avg_load_per_shard > 0.0 {
            max_entries as f64 / avg_load_per_shard
        } else {
            0.0
        };

        Self {
            total_entries,
            shards,
            total_operations,
            avg_load_per_shard,
            max_load_ratio,
        }
    }
}
