//! The ledger message envelope.
//!
//! The host pipeline knows nothing about Ethereum. It dispatches on a
//! routing key and a type tag, asks each message to validate itself, and
//! (for its own message kinds) discovers signers and sign bytes through
//! generic accessors. [`MsgEthereumTx`] implements that contract through
//! the [`Msg`] trait, with one deliberate hole: the generic signer and
//! sign-byte accessors fail with
//! [`TransactionError::UnsupportedOperation`], forcing the host onto
//! [`MsgEthereumTx::verify_signature`] and its chain-id-bound scheme.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{TransactionError, TxResult};
use super::signing::sign_transaction;
use super::types::TxData;
use super::verification::verify_signature;
use crate::config::{ROUTER_KEY, TYPE_MSG_ETHEREUM_TX};
use crate::crypto::{Address, EthKeypair, TxHash};

// ---------------------------------------------------------------------------
// Host message contract
// ---------------------------------------------------------------------------

/// Capabilities every ledger message exposes to the host dispatcher.
pub trait Msg {
    /// Routing key of the module that handles this message.
    fn route(&self) -> &'static str;

    /// Type tag, unique within the routing key.
    fn msg_type(&self) -> &'static str;

    /// Stateless validity checks. No signature or account state is consulted.
    fn validate_basic(&self) -> TxResult<()>;

    /// Messages contained in this one.
    fn get_msgs(&self) -> Vec<LedgerMsg>;

    /// Addresses whose signatures the host's generic path must check.
    fn get_signers(&self) -> TxResult<Vec<Address>>;

    /// Bytes the host's generic path would have signers sign.
    fn get_sign_bytes(&self) -> TxResult<Vec<u8>>;
}

/// Closed set of message kinds this crate contributes to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerMsg {
    EthereumTx(MsgEthereumTx),
}

impl Msg for LedgerMsg {
    fn route(&self) -> &'static str {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.route(),
        }
    }

    fn msg_type(&self) -> &'static str {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.msg_type(),
        }
    }

    fn validate_basic(&self) -> TxResult<()> {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.validate_basic(),
        }
    }

    fn get_msgs(&self) -> Vec<LedgerMsg> {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.get_msgs(),
        }
    }

    fn get_signers(&self) -> TxResult<Vec<Address>> {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.get_signers(),
        }
    }

    fn get_sign_bytes(&self) -> TxResult<Vec<u8>> {
        match self {
            LedgerMsg::EthereumTx(msg) => msg.get_sign_bytes(),
        }
    }
}

impl From<MsgEthereumTx> for LedgerMsg {
    fn from(msg: MsgEthereumTx) -> Self {
        LedgerMsg::EthereumTx(msg)
    }
}

// ---------------------------------------------------------------------------
// MsgEthereumTx
// ---------------------------------------------------------------------------

/// An Ethereum transaction carried as a ledger message.
///
/// The envelope adds no fields of its own; everything lives in [`TxData`].
/// Sign it with [`MsgEthereumTx::sign`], identify it with
/// [`MsgEthereumTx::hash`], and recover its sender with
/// [`MsgEthereumTx::verify_signature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEthereumTx {
    pub data: TxData,
}

impl MsgEthereumTx {
    /// A transaction to `to`. Passing `None` is equivalent to
    /// [`MsgEthereumTx::new_contract`].
    pub fn new(
        nonce: u64,
        to: Option<Address>,
        amount: Option<BigInt>,
        gas_limit: u64,
        price: Option<BigInt>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            data: TxData::new(nonce, to, amount, gas_limit, price, payload),
        }
    }

    /// A contract-creation transaction: no recipient, `payload` is the init
    /// code.
    pub fn new_contract(
        nonce: u64,
        amount: Option<BigInt>,
        gas_limit: u64,
        price: Option<BigInt>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(nonce, None, amount, gas_limit, price, payload)
    }

    pub fn from_data(data: TxData) -> Self {
        Self { data }
    }

    /// Recipient, or `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        self.data.recipient()
    }

    /// Signs in place for `chain_id`. See [`sign_transaction`].
    pub fn sign(&mut self, chain_id: u64, keypair: &EthKeypair) -> TxResult<()> {
        sign_transaction(&mut self.data, chain_id, keypair)
    }

    /// Recovers the signer for `chain_id`. See [`verify_signature`].
    pub fn verify_signature(&self, chain_id: u64) -> TxResult<Address> {
        verify_signature(&self.data, chain_id)
    }

    /// Sender address. Same as [`MsgEthereumTx::verify_signature`].
    pub fn from_address(&self, chain_id: u64) -> TxResult<Address> {
        self.verify_signature(chain_id)
    }

    /// Transaction id: Keccak-256 of the wire encoding.
    pub fn hash(&self) -> TxResult<TxHash> {
        self.data.hash()
    }

    pub fn sign_hash(&self, chain_id: u64) -> TxResult<TxHash> {
        self.data.sign_hash(chain_id)
    }

    /// Wire (RLP) encoding.
    pub fn rlp_bytes(&self) -> TxResult<Vec<u8>> {
        self.data.rlp_bytes()
    }

    pub fn decode_rlp(bytes: &[u8]) -> TxResult<Self> {
        TxData::decode_rlp(bytes).map(Self::from_data)
    }

    /// Maximum fee: `price * gas_limit`. Absent price is zero.
    pub fn fee(&self) -> BigInt {
        self.data.price().cloned().unwrap_or_default() * BigInt::from(self.data.gas_limit())
    }

    /// Maximum total debit from the sender: `fee + amount`.
    pub fn cost(&self) -> BigInt {
        self.fee() + self.data.amount().cloned().unwrap_or_default()
    }
}

impl Msg for MsgEthereumTx {
    fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    fn msg_type(&self) -> &'static str {
        TYPE_MSG_ETHEREUM_TX
    }

    fn validate_basic(&self) -> TxResult<()> {
        self.data.validate()
    }

    fn get_msgs(&self) -> Vec<LedgerMsg> {
        vec![LedgerMsg::EthereumTx(self.clone())]
    }

    fn get_signers(&self) -> TxResult<Vec<Address>> {
        warn!(
            msg_type = TYPE_MSG_ETHEREUM_TX,
            "generic signer discovery requested; use verify_signature"
        );
        Err(TransactionError::UnsupportedOperation {
            operation: "get_signers",
        })
    }

    fn get_sign_bytes(&self) -> TxResult<Vec<u8>> {
        warn!(
            msg_type = TYPE_MSG_ETHEREUM_TX,
            "generic sign bytes requested; use sign_hash"
        );
        Err(TransactionError::UnsupportedOperation {
            operation: "get_sign_bytes",
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
