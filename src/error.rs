/// Errors that can occur when configuring a ShardedMap.
///
/// Map operations themselves never fail: a missing key is reported through
/// `Option` or the `loaded` flag of [`load_or_store`](crate::ShardedMap::load_or_store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested shard count is positive but not a power of two.
    InvalidShardCount(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidShardCount(count) => {
                write!(f, "shard count must be a power of two, got {}", count)
            }
        }
    }
}

impl std::error::Error for Error {}
