// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA EVM: Ethereum Transaction Envelope
//!
//! Lets an Ethereum legacy transaction ride through the NOVA ledger's
//! message pipeline: encoded byte-for-byte the way Ethereum encodes it,
//! hashed the way Ethereum hashes it, signed and verified with EIP-155
//! replay protection bound to a chain id.
//!
//! ## Architecture
//!
//! - **transaction**: The field set, RLP encoding, signing, verification,
//!   and the `MsgEthereumTx` envelope the host dispatcher sees.
//! - **crypto**: Keccak-256, secp256k1 recoverable signatures, addresses.
//! - **config**: Routing key, type tag, chain ids, and signature constants.
//! - **logging**: `tracing` subscriber setup for binaries and tests.
//!
//! ## Design Philosophy
//!
//! 1. The wire format is Ethereum's. If a byte differs, it is a bug.
//! 2. Every failure is a typed error. The host decides what to reject.
//! 3. No curve arithmetic of our own. `secp256k1` does the math.

pub mod config;
pub mod crypto;
pub mod logging;
pub mod transaction;

pub use crypto::{Address, EthKeypair, TxHash};
pub use transaction::{LedgerMsg, Msg, MsgEthereumTx, TransactionError, TxData};
