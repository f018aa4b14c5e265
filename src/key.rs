//! Key kinds and how each one picks its shard.
//!
//! Byte-like keys (strings, byte vectors, identifiers) are run through the
//! map's [`ShardHasher`]. Integer keys are already spread over a numeric
//! domain and route on their own value, so with `n` shards an integer key
//! always lands in shard `key % n`.

use crate::hash::ShardHasher;
use uuid::Uuid;
use std::hash::Hash;

/// A key that can be routed to a shard.
///
/// Owned keys and their borrowed forms must produce the same route hash
/// (`String` and `str` both hash their UTF-8 bytes), so lookups by `&str`
/// find entries stored under a `String`.
pub trait ShardKey: Hash + Eq {
    /// Value whose low bits select the shard.
    fn route_hash(&self, hasher: &ShardHasher) -> u64;
}

impl ShardKey for str {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        hasher.hash_bytes(self.as_bytes())
    }
}

impl ShardKey for String {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        self.as_str().route_hash(hasher)
    }
}

impl ShardKey for [u8] {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        hasher.hash_bytes(self)
    }
}

impl ShardKey for Vec<u8> {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        self.as_slice().route_hash(hasher)
    }
}

impl ShardKey for u64 {
    #[inline]
    fn route_hash(&self, _hasher: &ShardHasher) -> u64 {
        *self
    }
}

impl ShardKey for usize {
    #[inline]
    fn route_hash(&self, _hasher: &ShardHasher) -> u64 {
        *self as u64
    }
}

impl ShardKey for Uuid {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        hasher.hash_bytes(self.as_bytes())
    }
}

impl<T: ShardKey + ?Sized> ShardKey for &T {
    #[inline]
    fn route_hash(&self, hasher: &ShardHasher) -> u64 {
        (**self).route_hash(hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_keys_route_on_their_value() {
        let hasher = ShardHasher::default();
        assert_eq!(42u64.route_hash(&hasher), 42);
        assert_eq!(7usize.route_hash(&hasher), 7);
    }

    #[test]
    fn test_owned_and_borrowed_forms_agree() {
        let hasher = ShardHasher::default();
        let owned = String::from("alpha");
        assert_eq!(owned.route_hash(&hasher), "alpha".route_hash(&hasher));
        assert_eq!((&"alpha").route_hash(&hasher), "alpha".route_hash(&hasher));

        let bytes = vec![1u8, 2, 3];
        assert_eq!(bytes.route_hash(&hasher), [1u8, 2, 3][..].route_hash(&hasher));
    }

    #[test]
    fn test_uuid_routes_like_its_bytes() {
        let hasher = ShardHasher::default();
        let id = Uuid::from_u128(0x1234);
        assert_eq!(id.route_hash(&hasher), hasher.hash_bytes(id.as_bytes()));
    }

    #[test]
    fn test_uuid_display_and_parse() {
        let id = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(), id);
        assert_eq!(Uuid::from_bytes([0u8; 16]), Uuid::nil());
    }

    #[test]
    fn test_parsed_and_numeric_forms_route_together() {
        let hasher = ShardHasher::default();
        let parsed = Uuid::parse_str("00000000-0000-0000-0000-000000001234").unwrap();
        assert_eq!(parsed.route_hash(&hasher), Uuid::from_u128(0x1234).route_hash(&hasher));
    }
}
