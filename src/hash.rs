use std::hash::Hasher;

/// Hash function used to route byte-like keys to shards.
/// Uses an enum so the map stays free of boxed hashers and type parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShardHasher {
    /// AHash with fixed keys (default, fast and well-distributed).
    #[default]
    AHash,
    /// FxHash implementation (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

impl ShardHasher {
    /// Hash a byte sequence. The result is stable for the life of the process,
    /// which is all shard routing needs.
    pub fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        match self {
            ShardHasher::AHash => {
                let mut hasher = ahash::AHasher::default();
                hasher.write(bytes);
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                hasher.write(bytes);
                hasher.finish()
            }
        }
    }
}
