//! # Cryptographic Primitives
//!
//! Everything Ethereum-compatible signing needs, and nothing more:
//!
//! - **Keccak-256** for digests, transaction ids and address derivation.
//! - **secp256k1** recoverable ECDSA for signatures.
//! - **20-byte addresses** derived from uncompressed public keys.
//!
//! Everything here is a thin, type-safe wrapper around `sha3` and
//! `secp256k1`. No curve arithmetic is implemented in this crate.

pub mod address;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use address::{generate_address, Address, AddressError};
pub use hash::{keccak256, TxHash};
pub use keys::{EthKeypair, EthPublicKey, KeyError};
pub use signatures::{recover_address, sign_prehash, RecoverableSig, SignatureError};
