use crate::error::Error;
use crate::hash::ShardHasher;
use crate::key::ShardKey;

/// Shard count used when none (or a non-positive one) is requested.
pub const DEFAULT_SHARD_COUNT: usize = 32;

/// Which hash function to use for routing byte-like keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFunction {
    /// Use ahash (default, fast and well-distributed).
    #[default]
    AHash,
    /// Use fxhash (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

/// Configuration for a ShardedMap instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) shard_count: usize,
    pub(crate) hash_function: HashFunction,
    pub(crate) capacity_per_shard: Option<usize>,
}

impl Config {
    /// Create a new config with defaults (32 shards, ahash).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards.
    ///
    /// Routing masks the key hash with `count - 1`, so a positive count must
    /// be a power of two. Zero or a negative count selects
    /// [`DEFAULT_SHARD_COUNT`].
    pub fn shard_count(mut self, count: i64) -> Result<Self, Error> {
        self.shard_count = resolve_shard_count(count)?;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.hash_function = hash_fn;
        self
    }

    /// Set initial capacity per shard. Total capacity will be approximately
    /// `capacity_per_shard * shard_count`. Omitted by default (HashMap default).
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            hash_function: HashFunction::AHash,
            capacity_per_shard: None,
        }
    }
}

fn resolve_shard_count(count: i64) -> Result<usize, Error> {
    if count <= 0 {
        tracing::debug!(
            requested = count,
            default = DEFAULT_SHARD_COUNT,
            "non-positive shard count, using default"
        );
        return Ok(DEFAULT_SHARD_COUNT);
    }
    match usize::try_from(count) {
        Ok(n) if n.is_power_of_two() => Ok(n),
        _ => {
            tracing::warn!(requested = count, "rejecting shard count that is not a power of two");
            Err(Error::InvalidShardCount(count))
        }
    }
}

/// Builder for creating a ShardedMap with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ShardedMapBuilder {
    config: Config,
}

impl ShardedMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of shards. See [`Config::shard_count`].
    pub fn shard_count(mut self, count: i64) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.config = self.config.hash_function(hash_fn);
        self
    }

    /// Set initial capacity per shard. Total capacity ≈ `capacity_per_shard * shard_count`.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Build a ShardedMap with the configured settings.
    pub fn build<K, V>(self) -> crate::ShardedMap<K, V>
    where
        K: ShardKey + Send + Sync,
        V: Send + Sync,
    {
        crate::ShardedMap::with_config(self.config)
    }
}

/// Create a hash function instance based on the configuration.
pub(crate) fn create_hasher(hash_fn: HashFunction) -> ShardHasher {
    match hash_fn {
        HashFunction::AHash => ShardHasher::AHash,
        #[cfg(feature = "fxhash")]
        HashFunction::FxHash => ShardHasher::FxHash,
    }
}
