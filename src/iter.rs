use crate::shard::Shard;
use std::hash::Hash;
use std::sync::Arc;
use std::vec;

/// Owned iterator over entries copied out of a map.
///
/// Entries are gathered one shard at a time, each under that shard's read
/// lock, before iteration starts. Each shard's portion is consistent on its
/// own; the whole is not a point-in-time view of the map.
pub struct SnapshotIter<K, V> {
    entries: vec::IntoIter<(K, Arc<V>)>,
}

impl<K, V> SnapshotIter<K, V>
where
    K: Hash + Eq + Send + Sync + Clone,
    V: Send + Sync,
{
    pub(crate) fn new(shards: &[Shard<K, V>]) -> Self {
        let mut entries = Vec::new();
        for shard in shards {
            shard.collect_into(&mut entries);
        }
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for SnapshotIter<K, V> {
    type Item = (K, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for SnapshotIter<K, V> {}
