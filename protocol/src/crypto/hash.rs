//! # Hashing Utilities
//!
//! Ethereum compatibility leaves exactly one choice here: **Keccak-256**, the
//! pre-standardisation variant of SHA-3 (different padding byte than the
//! final FIPS-202 `SHA3-256`). It is used for:
//!
//! - the signing digest (keccak of the sign payload),
//! - the transaction id (keccak of the signed wire encoding),
//! - address derivation (last 20 bytes of keccak of the public key).
//!
//! Do not swap in `sha3::Sha3_256`. It produces different digests and every
//! signature and hash would silently stop matching the rest of the world.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::config::HASH_LENGTH;

/// Compute the Keccak-256 hash of the input data.
///
/// # Example
///
/// ```
/// use nova_evm::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(hash[0], 0xc5);
/// ```
pub fn keccak256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// A 32-byte Keccak-256 digest identifying a transaction (or a sign payload).
///
/// Displays and serialises as upper-case hex without a prefix, which is how
/// host block explorers and the existing test vectors print it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxHash([u8; HASH_LENGTH]);

impl TxHash {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Hashes `data` with Keccak-256.
    pub fn of(data: &[u8]) -> Self {
        Self(keccak256(data))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl From<[u8; HASH_LENGTH]> for TxHash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; HASH_LENGTH];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty_vector() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_is_not_sha3() {
        // FIPS-202 SHA3-256("") starts with a7ffc6f8. Keccak must not.
        assert_ne!(keccak256(b"")[0], 0xa7);
    }

    #[test]
    fn keccak256_deterministic() {
        assert_eq!(keccak256(b"nova"), keccak256(b"nova"));
        assert_ne!(keccak256(b"nova"), keccak256(b"avon"));
    }

    #[test]
    fn test_tx_hash_hex_roundtrip() {
        let hash = TxHash::of(b"envelope");
        let parsed: TxHash = hash.to_hex().parse().unwrap();
        assert_eq!(parsed, hash);

        let prefixed: TxHash = format!("0x{}", hash.to_hex().to_lowercase())
            .parse()
            .unwrap();
        assert_eq!(prefixed, hash);
    }

    #[test]
    fn test_tx_hash_rejects_wrong_length() {
        assert!("abcd".parse::<TxHash>().is_err());
    }

    #[test]
    fn test_tx_hash_json_is_hex_string() {
        let hash = TxHash::new([0xAB; HASH_LENGTH]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "AB".repeat(HASH_LENGTH)));
        let back: TxHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
