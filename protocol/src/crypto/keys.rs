//! # Key Management
//!
//! secp256k1 keypairs for signing Ethereum transactions.
//!
//! Ethereum fixed the curve for us, so there is no algorithm choice to make
//! here. What this module does own is key hygiene:
//!
//! - Keys are generated from the OS RNG (`OsRng`).
//! - Secret scalars are validated on import: zero and values ≥ the curve
//!   order are rejected by `secp256k1`.
//! - Key bytes are never logged and never appear in `Debug` output.
//!
//! Wallet storage, HD derivation and hardware signers are outside this
//! crate. They hand us a 32-byte secret or sign the digest themselves.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, SecretKey};
use std::fmt;
use thiserror::Error;

use super::address::Address;
use crate::config::{SECRET_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH};

/// Errors that can occur during key operations.
///
/// Deliberately terse: no key material or scalar details in messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid secp256k1 point")]
    InvalidPublicKey,
}

/// A secp256k1 signing keypair.
///
/// `EthKeypair` does not implement `Serialize`. Exporting a secret key is an
/// explicit call to [`EthKeypair::secret_key_bytes`].
#[derive(Clone)]
pub struct EthKeypair {
    secret: SecretKey,
}

/// The public half of an [`EthKeypair`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EthPublicKey {
    inner: PublicKey,
}

impl EthKeypair {
    /// Generate a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            secret: SecretKey::new(&mut OsRng),
        }
    }

    /// Reconstruct a keypair from a raw 32-byte secret scalar.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { secret })
    }

    /// Reconstruct a keypair from a hex-encoded secret, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> EthPublicKey {
        EthPublicKey {
            inner: PublicKey::from_secret_key_global(&self.secret),
        }
    }

    /// The account address controlled by this keypair.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Exports the raw 32-byte secret scalar. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.secret.secret_bytes()
    }

    /// Needed by the signing path, which talks to `secp256k1` directly.
    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for EthKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthKeypair(address={})", self.address())
    }
}

impl PartialEq for EthKeypair {
    /// Compares public keys, never secret material.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for EthKeypair {}

// ---------------------------------------------------------------------------
// EthPublicKey
// ---------------------------------------------------------------------------

impl EthPublicKey {
    /// Parses a compressed (33-byte) or uncompressed (65-byte) public key.
    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let inner = PublicKey::from_slice(slice).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// The 65-byte uncompressed SEC1 encoding, `0x04 ‖ X ‖ Y`.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        self.inner.serialize_uncompressed()
    }

    pub fn address(&self) -> Address {
        Address::from_uncompressed_public_key(&self.to_uncompressed())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }
}

impl From<PublicKey> for EthPublicKey {
    fn from(inner: PublicKey) -> Self {
        Self { inner }
    }
}

impl fmt::Display for EthPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for EthPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthPublicKey({})", &self.to_hex()[..18])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known throwaway key (the first hardhat/anvil dev account).
    const DEV_SECRET: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_known_secret_derives_known_address() {
        let kp = EthKeypair::from_hex(DEV_SECRET).unwrap();
        assert_eq!(kp.address().to_string(), DEV_ADDRESS);
    }

    #[test]
    fn test_from_hex_accepts_prefix() {
        let a = EthKeypair::from_hex(DEV_SECRET).unwrap();
        let b = EthKeypair::from_hex(&format!("0x{}", DEV_SECRET)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_secret_bytes_roundtrip() {
        let kp = EthKeypair::generate();
        let restored = EthKeypair::from_bytes(&kp.secret_key_bytes()).unwrap();
        assert_eq!(kp, restored);
        assert_eq!(kp.address(), restored.address());
    }

    #[test]
    fn test_zero_secret_rejected() {
        assert_eq!(
            EthKeypair::from_bytes(&[0u8; SECRET_KEY_LENGTH]),
            Err(KeyError::InvalidSecretKey)
        );
    }

    #[test]
    fn test_secret_above_curve_order_rejected() {
        assert!(EthKeypair::from_bytes(&[0xFF; SECRET_KEY_LENGTH]).is_err());
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(EthKeypair::from_hex("abcd").is_err());
        assert!(EthKeypair::from_hex("not hex at all").is_err());
    }

    #[test]
    fn test_uncompressed_key_has_prefix() {
        let pk = EthKeypair::generate().public_key();
        let bytes = pk.to_uncompressed();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(EthPublicKey::from_slice(&bytes).unwrap(), pk);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let kp = EthKeypair::from_hex(DEV_SECRET).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(DEV_SECRET));
        assert!(debug.contains(DEV_ADDRESS));
    }

    #[test]
    fn test_public_key_rejects_garbage() {
        assert_eq!(
            EthPublicKey::from_slice(&[0x04; 10]),
            Err(KeyError::InvalidPublicKey)
        );
    }
}
