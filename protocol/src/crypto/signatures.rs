//! # Recoverable Signatures
//!
//! secp256k1 ECDSA signatures in Ethereum's 65-byte recoverable layout:
//!
//! ```text
//! [ r (32, big-endian) | s (32, big-endian) | recovery id (1, 0 or 1) ]
//! ```
//!
//! The recovery id is what lets a verifier rebuild the signer's public key
//! from `(digest, signature)` alone, which is why Ethereum transactions carry
//! no public key.
//!
//! ## Strictness
//!
//! Recovery in `secp256k1` accepts high-s signatures. Ethereum has rejected
//! them since Homestead, so [`RecoverableSig::validate_values`] enforces
//! `0 < r < n` and `0 < s ≤ n/2` before anything is recovered. Signatures
//! produced by [`sign_prehash`] are always low-s.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{constants::CURVE_ORDER, Message, SECP256K1};
use thiserror::Error;

use super::address::Address;
use super::keys::{EthKeypair, EthPublicKey};
use crate::config::{HASH_LENGTH, SIGNATURE_LENGTH};

/// Half the secp256k1 group order, `n / 2` rounded down.
const HALF_CURVE_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Errors during signature operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid recovery id {0}: expected 0 or 1")]
    InvalidRecoveryId(u8),

    #[error("signature values out of range")]
    OutOfRange,

    #[error("malformed signature: expected {SIGNATURE_LENGTH} bytes, got {0}")]
    MalformedSignature(usize),

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A 65-byte recoverable ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSig {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl RecoverableSig {
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Self {
        Self { r, s, recovery_id }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::MalformedSignature(bytes.len()));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self::new(r, s, bytes[64]))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id;
        out
    }

    /// Range checks Ethereum applies before recovery: recovery id is 0 or 1,
    /// `0 < r < n`, and `0 < s ≤ n/2` (no malleable high-s signatures).
    ///
    /// Fixed-width big-endian arrays compare lexicographically in numeric
    /// order, so plain slice comparison is enough here.
    pub fn validate_values(&self) -> Result<(), SignatureError> {
        if self.recovery_id > 1 {
            return Err(SignatureError::InvalidRecoveryId(self.recovery_id));
        }
        let zero = [0u8; 32];
        if self.r == zero || self.s == zero {
            return Err(SignatureError::OutOfRange);
        }
        if self.r >= CURVE_ORDER || self.s > HALF_CURVE_ORDER {
            return Err(SignatureError::OutOfRange);
        }
        Ok(())
    }

    fn to_secp(self) -> Result<RecoverableSignature, SignatureError> {
        let recid = RecoveryId::from_i32(i32::from(self.recovery_id))
            .map_err(|_| SignatureError::InvalidRecoveryId(self.recovery_id))?;
        let bytes = self.to_bytes();
        RecoverableSignature::from_compact(&bytes[..64], recid)
            .map_err(|_| SignatureError::OutOfRange)
    }
}

impl std::fmt::Debug for RecoverableSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RecoverableSig(r={}.., recid={})",
            &hex::encode(self.r)[..8],
            self.recovery_id
        )
    }
}

/// Signs a 32-byte digest. The digest is used as-is: hashing the message is
/// the caller's job (for transactions, keccak256 of the sign payload).
pub fn sign_prehash(keypair: &EthKeypair, digest: &[u8; HASH_LENGTH]) -> RecoverableSig {
    let message = Message::from_digest(*digest);
    let signature = SECP256K1.sign_ecdsa_recoverable(&message, keypair.secret_key());
    let (recid, compact) = signature.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);
    // secp256k1 only ever produces recovery ids 0..=3, and 2/3 are
    // astronomically unlikely; the cast cannot truncate.
    RecoverableSig::new(r, s, recid.to_i32() as u8)
}

/// Recovers the public key that produced `signature` over `digest`.
pub fn recover_public_key(
    digest: &[u8; HASH_LENGTH],
    signature: &RecoverableSig,
) -> Result<EthPublicKey, SignatureError> {
    signature.validate_values()?;
    let recoverable = signature.to_secp()?;
    let message = Message::from_digest(*digest);
    SECP256K1
        .recover_ecdsa(&message, &recoverable)
        .map(EthPublicKey::from)
        .map_err(|_| SignatureError::RecoveryFailed)
}

/// Recovers the signer address: last 20 bytes of keccak256 of the recovered
/// uncompressed public key without its prefix byte.
pub fn recover_address(
    digest: &[u8; HASH_LENGTH],
    signature: &RecoverableSig,
) -> Result<Address, SignatureError> {
    recover_public_key(digest, signature).map(|pk| pk.address())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
