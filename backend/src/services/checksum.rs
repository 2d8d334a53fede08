//! Content fingerprints for change detection between refreshes.

use sha2::{Digest, Sha256};

use crate::models::LaunchSet;

/// Calculate SHA-256 checksum of arbitrary content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint of a launch set's serialized form.
///
/// Two refreshes that produce the same launches yield the same fingerprint.
pub fn fingerprint(launches: &LaunchSet) -> String {
    // Serializing plain structs of strings, floats and timestamps cannot fail.
    let bytes = serde_json::to_vec(launches).unwrap_or_default();
    calculate_checksum(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = br#"{"test": "data"}"#;
        let checksum1 = calculate_checksum(content);
        let checksum2 = calculate_checksum(content);
        assert_eq!(checksum1, checksum2);
    }

    #[test]
    fn test_different_content_different_checksum() {
        let checksum1 = calculate_checksum(br#"{"test": "data1"}"#);
        let checksum2 = calculate_checksum(br#"{"test": "data2"}"#);
        assert_ne!(checksum1, checksum2);
    }

    #[test]
    fn test_empty_set_fingerprint_is_hash_of_empty_array() {
        assert_eq!(fingerprint(&LaunchSet::empty()), calculate_checksum(b"[]"));
    }
}
