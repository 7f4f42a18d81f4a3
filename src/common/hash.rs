//! Helper functions for content hashes.

use crate::Id;

/// Checks a value returned by a neighbor against the target it was looked up by.
///
/// The SHA-1 of the value itself must equal the target (the SHA-1 of the key),
/// so a neighbor holding the right value under a key with a different digest
/// is still rejected.
pub fn validate_value(value: &[u8], target: &Id) -> bool {
    Id::from_key(value) == *target
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_value() {
        let target = Id::from_key(b"bar");

        assert!(validate_value(b"bar", &target));
        assert!(!validate_value(b"ba", &target));
    }

    #[test]
    fn value_must_hash_to_key_digest() {
        // "bar" is the value, "foo" the key; their digests differ.
        assert!(!validate_value(b"bar", &Id::from_key(b"foo")));
    }
}
