//! # Account Addresses
//!
//! A 20-byte Ethereum account address: the last 20 bytes of the Keccak-256
//! hash of an uncompressed secp256k1 public key (without its `0x04` prefix).
//!
//! The type is a fixed-size array newtype, so "a recipient of the wrong
//! length" is unrepresentable. Contract creation is modelled as
//! `Option<Address>::None` by the transaction, never as a zero address.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::hash::keccak256;
use crate::config::{ADDRESS_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH};

/// Errors when parsing an address from bytes or text.
#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("invalid address length: expected {ADDRESS_LENGTH} bytes, got {actual}")]
    InvalidLength { actual: usize },

    #[error("invalid address hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address. Not a contract-creation marker; see module docs.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Exact-length conversion. Anything but 20 bytes is rejected.
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            slice
                .try_into()
                .map_err(|_| AddressError::InvalidLength {
                    actual: slice.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Lenient conversion: keeps the last 20 bytes of longer input and
    /// left-pads shorter input with zeros.
    ///
    /// ```
    /// use nova_evm::crypto::Address;
    ///
    /// let addr = Address::from_bytes_left_padded(b"test_address");
    /// assert_eq!(addr.to_string(), "0x0000000000000000746573745f61646472657373");
    /// ```
    pub fn from_bytes_left_padded(bytes: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LENGTH];
        let take = bytes.len().min(ADDRESS_LENGTH);
        out[ADDRESS_LENGTH - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        Self(out)
    }

    /// Derives the address of an uncompressed (65-byte, `0x04`-prefixed)
    /// public key.
    pub fn from_uncompressed_public_key(public_key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH]) -> Self {
        let hash = keccak256(&public_key[1..]);
        Self::from_bytes_left_padded(&hash)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Lower-case hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Generates a random address. Handy for tests and devnet fixtures; there is
/// no key behind it.
pub fn generate_address() -> Address {
    let mut bytes = [0u8; ADDRESS_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    Address(bytes)
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
