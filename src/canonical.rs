//! Canonical serialization for deterministic view fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable map order: exported maps are BTreeMaps, keyed canonically
//! - No HashMap allowed in fingerprinted data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization failed")
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute the canonical hash and return it as a hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    #[test]
    fn test_determinism() {
        let s = Sample {
            name: "sample".to_string(),
            value: 7,
        };
        assert_eq!(canonical_hash(&s), canonical_hash(&s));
    }

    #[test]
    fn test_distinct_values_distinct_hashes() {
        let a = Sample {
            name: "a".to_string(),
            value: 1,
        };
        let b = Sample {
            name: "a".to_string(),
            value: 2,
        };
        assert_ne!(canonical_hash_hex(&a), canonical_hash_hex(&b));
    }
}
