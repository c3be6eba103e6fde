use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Hash used to index registration numbers.
///
/// Surrounding whitespace is ignored and letters are compared case-insensitively,
/// so `"mat-001"` and `" MAT-001 "` land on the same index entry.
pub fn registration_number_hash(registration_number: &str) -> Result<i64, String> {
    hash_as_i64(&registration_number.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let first = hash_as_i64(&"MAT-001").unwrap();
        let second = hash_as_i64(&"MAT-001").unwrap();
        assert_eq!(first, second);
        assert_ne!(first, hash_as_i64(&"MAT-002").unwrap());
    }

    #[test]
    fn test_registration_number_hash_normalizes_input() {
        assert_eq!(
            registration_number_hash(" mat-001 ").unwrap(),
            registration_number_hash("MAT-001").unwrap()
        );
    }
}
