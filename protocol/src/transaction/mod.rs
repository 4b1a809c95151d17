//! # Transaction Module
//!
//! Construction, encoding, signing, and verification of Ethereum legacy
//! transactions carried as NOVA ledger messages.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TxData field set, accessors, basic validation
//! encoding.rs     RLP wire encoding, sign payload, hash / sign hash
//! signing.rs      secp256k1 recoverable signing with EIP-155 `v`
//! verification.rs Sender recovery and chain id enforcement
//! msg.rs          MsgEthereumTx envelope and the host `Msg` contract
//! codec.rs        Binary (bincode) and JSON ledger codec
//! error.rs        TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`MsgEthereumTx::new`] or [`MsgEthereumTx::new_contract`].
//! 2. **Validate**: [`Msg::validate_basic`] rejects negative values.
//! 3. **Sign**: [`MsgEthereumTx::sign`] with the sender's keypair and chain id.
//! 4. **Relay**: [`MsgEthereumTx::rlp_bytes`] on the wire, or the ledger
//!    codec for storage.
//! 5. **Verify**: [`MsgEthereumTx::verify_signature`] recovers the sender
//!    and rejects signatures made for another chain.
//!
//! ## Design Decisions
//!
//! - The transaction id is Keccak-256 of the *signed* wire encoding, so it
//!   changes when the transaction is signed. Use the sign hash for anything
//!   that must be stable across signing.
//! - Amounts, prices and signature components are arbitrary-precision
//!   `BigInt`s. No floating point anywhere near monetary values.
//! - Chain id 0 produces the six-field pre-EIP-155 sign payload and
//!   `v ∈ {27, 28}`. Any other chain id is folded into `v`.

pub mod codec;
pub mod encoding;
pub mod error;
pub mod msg;
pub mod signing;
pub mod types;
pub mod verification;

pub use error::{TransactionError, TxResult};
pub use msg::{LedgerMsg, Msg, MsgEthereumTx};
pub use signing::sign_transaction;
pub use types::TxData;
pub use verification::verify_signature;
