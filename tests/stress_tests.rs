//! Load tests: many threads hammering a small key pool, then verify the final state.

use shardedmap::{ShardedMap, StrMap, Uint64Map};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

#[test]
fn test_load_or_store_contention() {
    const THREADS: u64 = 100;
    const CALLS_PER_THREAD: u64 = 1_000;
    const KEYS: u64 = 50;

    let map: Arc<Uint64Map<u64>> = Arc::new(ShardedMap::with_shard_count(8).unwrap());
    let mut handles = vec![];

    for t in 0..THREADS {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            let mut wins = Vec::new();
            let mut observed = Vec::new();
            for i in 0..CALLS_PER_THREAD {
                let key = i % KEYS;
                // Unique per call, so the winner can be identified
                let candidate = t * CALLS_PER_THREAD + i;
                let (actual, loaded) = map.load_or_store(key, candidate);
                if loaded {
                    observed.push((key, *actual));
                } else {
                    assert_eq!(*actual, candidate);
                    wins.push((key, candidate));
                }
            }
            (wins, observed)
        }));
    }

    let mut winners: HashMap<u64, u64> = HashMap::new();
    let mut observed = Vec::new();
    for handle in handles {
        let (wins, seen) = handle.join().unwrap();
        for (key, value) in wins {
            assert!(winners.insert(key, value).is_none(), "key {} won twice", key);
        }
        observed.extend(seen);
    }

    assert_eq!(winners.len() as u64, KEYS);
    assert_eq!(map.len() as u64, KEYS);
    for (key, value) in &winners {
        assert_eq!(*map.load(key).unwrap(), *value);
    }
    for (key, value) in observed {
        assert_eq!(winners[&key], value);
    }
}

#[test]
fn test_under_load_then_introspect() {
    let map = Arc::new(StrMap::new());
    let mut handles = vec![];

    for t in 0..4 {
        let map = Arc::clone(&map);
        let handle = thread::spawn(move || {
            for i in 0..2000 {
                let key = format!("t{}_k{}", t, i);
                map.store(key, i);
            }
            for i in 0..2000 {
                let key = format!("t{}_k{}", t, i);
                map.delete(key.as_str());
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    let loads = map.shard_loads();
    assert_eq!(loads.iter().sum::<usize>(), 0);
}
