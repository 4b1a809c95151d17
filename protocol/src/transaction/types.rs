//! The transaction field set.
//!
//! [`TxData`] is the payload of a legacy (pre-EIP-2718) Ethereum transaction:
//! the six base fields plus the `v`, `r`, `s` signature triple. It owns no
//! behaviour beyond accessors and invariants; encoding lives in
//! [`super::encoding`], signing in [`super::signing`], verification in
//! [`super::verification`].
//!
//! ## Absent vs zero
//!
//! `price`, `amount`, `v`, `r` and `s` are `Option<BigInt>`. On the wire an
//! absent integer and a zero integer are the same empty string, so the
//! constructor stores a zero `price`/`amount` as `None` and the decoder
//! restores an empty integer as `None`. That keeps wire round trips exact.
//! The JSON and binary codecs preserve whichever form they are given.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::config::{EIP155_V_OFFSET, LEGACY_V_OFFSET};
use crate::crypto::Address;

/// Transaction payload. Fields are read through accessors; the signature
/// triple is only ever written by signing or by decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxData {
    pub(crate) nonce: u64,
    #[serde(with = "serde_helpers::opt_bigint")]
    pub(crate) price: Option<BigInt>,
    pub(crate) gas_limit: u64,
    pub(crate) recipient: Option<Address>,
    #[serde(with = "serde_helpers::opt_bigint")]
    pub(crate) amount: Option<BigInt>,
    #[serde(with = "serde_helpers::hex_bytes")]
    pub(crate) payload: Vec<u8>,

    #[serde(with = "serde_helpers::opt_bigint")]
    pub(crate) v: Option<BigInt>,
    #[serde(with = "serde_helpers::opt_bigint")]
    pub(crate) r: Option<BigInt>,
    #[serde(with = "serde_helpers::opt_bigint")]
    pub(crate) s: Option<BigInt>,
}

impl TxData {
    /// Builds an unsigned field set. `recipient == None` means contract
    /// creation. Negative values are accepted here and rejected by
    /// [`TxData::validate`].
    pub fn new(
        nonce: u64,
        recipient: Option<Address>,
        amount: Option<BigInt>,
        gas_limit: u64,
        price: Option<BigInt>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            nonce,
            price: non_zero(price),
            gas_limit,
            recipient,
            amount: non_zero(amount),
            payload: payload.into(),
            v: None,
            r: None,
            s: None,
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn price(&self) -> Option<&BigInt> {
        self.price.as_ref()
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn recipient(&self) -> Option<Address> {
        self.recipient
    }

    pub fn amount(&self) -> Option<&BigInt> {
        self.amount.as_ref()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn v(&self) -> Option<&BigInt> {
        self.v.as_ref()
    }

    pub fn r(&self) -> Option<&BigInt> {
        self.r.as_ref()
    }

    pub fn s(&self) -> Option<&BigInt> {
        self.s.as_ref()
    }

    /// Contract creation: no recipient.
    pub fn is_contract_creation(&self) -> bool {
        self.recipient.is_none()
    }

    /// All three signature components are present.
    pub fn is_signed(&self) -> bool {
        self.v.is_some() && self.r.is_some() && self.s.is_some()
    }

    /// Whether `v` uses the EIP-155 (chain-id carrying) form, `v ≥ 35`.
    /// Unsigned, legacy `v ∈ {27, 28}` and malformed `v` are unprotected.
    pub fn is_protected(&self) -> bool {
        self.v
            .as_ref()
            .is_some_and(|v| *v >= BigInt::from(EIP155_V_OFFSET))
    }

    /// Chain id folded into `v`, if any: `(v - 35) / 2` for protected
    /// signatures. `None` for unsigned, legacy, or out-of-range `v`.
    pub fn chain_id(&self) -> Option<u64> {
        let v = self.v.as_ref()?;
        if is_legacy_v(v) {
            return None;
        }
        let offset = BigInt::from(EIP155_V_OFFSET);
        if *v < offset {
            return None;
        }
        ((v - offset) / 2u32).to_u64()
    }

    /// Basic validity: `amount ≥ 0` and `price ≥ 0`. Absent values are
    /// zero and therefore valid. Nonce and gas limit are the host's concern.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.amount.as_ref().is_some_and(|a| a.is_negative()) {
            return Err(TransactionError::InvalidValue {
                field: "amount",
                reason: "amount cannot be negative".to_string(),
            });
        }
        if self.price.as_ref().is_some_and(|p| p.is_negative()) {
            return Err(TransactionError::InvalidValue {
                field: "gas price",
                reason: "gas price cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// `v ∈ {27, 28}`.
pub(crate) fn is_legacy_v(v: &BigInt) -> bool {
    *v == BigInt::from(LEGACY_V_OFFSET) || *v == BigInt::from(LEGACY_V_OFFSET + 1)
}

fn non_zero(value: Option<BigInt>) -> Option<BigInt> {
    value.filter(|v| !v.is_zero())
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

pub(crate) mod serde_helpers {
    //! Big integers as decimal strings and byte strings as `0x` hex, so the
    //! JSON form is readable and exact for values beyond 2^53.

    pub mod opt_bigint {
        use num_bigint::BigInt;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<BigInt>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&v.to_str_radix(10)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<BigInt>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| s.parse::<BigInt>().map_err(D::Error::custom))
                .transpose()
        }
    }

    pub mod hex_bytes {
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&format!("0x{}", hex::encode(value)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
            let raw = String::deserialize(deserializer)?;
            let raw = raw.strip_prefix("0x").unwrap_or(&raw);
            hex::decode(raw).map_err(D::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
