//! Error type shared by every transaction operation.
//!
//! The variants map onto the four failure kinds the host pipeline reacts to:
//!
//! | kind                   | variants                                |
//! |------------------------|-----------------------------------------|
//! | invalid value          | [`TransactionError::InvalidValue`]      |
//! | decode error           | `Decode`, `MalformedField`, `Codec`     |
//! | invalid signature      | [`TransactionError::InvalidSignature`]  |
//! | unsupported operation  | [`TransactionError::UnsupportedOperation`] |

use thiserror::Error;

use crate::crypto::SignatureError;

/// Result alias used across the transaction module.
pub type TxResult<T> = Result<T, TransactionError>;

#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    /// A field holds a value the protocol does not allow (negative amount or
    /// gas price).
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// The wire bytes are not well-formed RLP, or not a nine-item list.
    #[error("rlp decode failed: {0}")]
    Decode(#[from] rlp::DecoderError),

    /// The RLP is well-formed but a field does not fit its type.
    #[error("malformed {field}: {reason}")]
    MalformedField { field: &'static str, reason: String },

    /// Missing or inconsistent v/r/s, chain id mismatch, or recovery failure.
    #[error("invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// The caller used a generic host accessor this message does not support.
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    /// The generic ledger codec (binary or JSON) failed.
    #[error("codec error: {reason}")]
    Codec { reason: String },
}

impl TransactionError {
    pub(crate) fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// True for every variant produced by a failed decode.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::MalformedField { .. } | Self::Codec { .. }
        )
    }

    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}

impl From<SignatureError> for TransactionError {
    fn from(err: SignatureError) -> Self {
        Self::invalid_signature(err.to_string())
    }
}

impl From<bincode::Error> for TransactionError {
    fn from(err: bincode::Error) -> Self {
        Self::Codec {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TransactionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec {
            reason: err.to_string(),
        }
    }
}
