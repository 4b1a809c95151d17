//! Signature verification: recover the sender from `(v, r, s)`.
//!
//! Ethereum transactions carry no public key. The sender is whoever's key
//! recovers from the signature over the chain-aware sign hash, so
//! verification and sender lookup are the same operation.
//!
//! The checks are ordered from cheapest to most expensive: presence and
//! range of `v`/`r`/`s` first, then the chain id folded into `v`, and only
//! then the sign payload encoding and elliptic-curve recovery.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use tracing::debug;

use super::error::{TransactionError, TxResult};
use super::types::{is_legacy_v, TxData};
use crate::config::{CHAIN_ID_UNPROTECTED, EIP155_V_OFFSET, LEGACY_V_OFFSET};
use crate::crypto::signatures::{recover_address, RecoverableSig};
use crate::crypto::Address;

/// Recovers the signer of `tx` for `chain_id`.
///
/// `v` is inverted the same way [`sign_transaction`](super::sign_transaction)
/// builds it:
///
/// 1. **Legacy** `v ∈ {27, 28}`: `recovery_id = v - 27`, digest is the
///    six-field (chain id 0) sign hash. The requested chain id is not
///    consulted, matching how pre-EIP-155 signatures are accepted everywhere.
///    Such a signature carries no chain id, so it verifies on every chain:
///    callers that require replay protection must also check
///    [`TxData::is_protected`].
/// 2. **Protected** `v ≥ 35`: `chain_id' = (v - 35) / 2`,
///    `recovery_id = (v - 35) % 2`. `chain_id'` must equal `chain_id`, and
///    must not be zero.
/// 3. `r` and `s` are left-padded to 32 bytes, range-checked (low-s), and
///    the public key is recovered from the digest.
///
/// # Errors
///
/// [`TransactionError::InvalidSignature`] when `v`, `r` or `s` is missing
/// or out of range, the chain id folded into `v` differs from `chain_id`,
/// or recovery fails. Encoding errors from the sign payload propagate
/// unchanged.
pub fn verify_signature(tx: &TxData, chain_id: u64) -> TxResult<Address> {
    let (Some(v), Some(r), Some(s)) = (tx.v(), tx.r(), tx.s()) else {
        return Err(TransactionError::invalid_signature(
            "transaction is missing v, r or s",
        ));
    };

    let (recovery_id, signing_chain_id) = split_v(v, chain_id)?;
    let signature = RecoverableSig::new(
        left_pad_32(r, "r")?,
        left_pad_32(s, "s")?,
        recovery_id,
    );

    let digest = tx.sign_hash(signing_chain_id)?;
    let sender = recover_address(digest.as_bytes(), &signature)?;

    debug!(
        chain_id = signing_chain_id,
        %sender,
        sign_hash = %digest,
        "verified transaction signature"
    );
    Ok(sender)
}

/// Splits `v` into `(recovery_id, chain id of the digest to verify)`.
fn split_v(v: &BigInt, chain_id: u64) -> TxResult<(u8, u64)> {
    if is_legacy_v(v) {
        let recovery_id = u8::from(*v != BigInt::from(LEGACY_V_OFFSET));
        return Ok((recovery_id, CHAIN_ID_UNPROTECTED));
    }

    if *v < BigInt::from(EIP155_V_OFFSET) {
        return Err(TransactionError::invalid_signature(format!(
            "v = {} is neither legacy nor EIP-155",
            v
        )));
    }

    let folded = v - EIP155_V_OFFSET;
    let recovery_id = u8::from(!(&folded % 2u32).is_zero());
    let derived: BigInt = folded / 2u32;

    if derived.is_zero() {
        return Err(TransactionError::invalid_signature(
            "protected signature cannot carry chain id 0",
        ));
    }
    if derived != BigInt::from(chain_id) {
        return Err(TransactionError::invalid_signature(format!(
            "chain id mismatch: signature is for chain {}, expected {}",
            derived, chain_id
        )));
    }
    Ok((recovery_id, chain_id))
}

fn left_pad_32(value: &BigInt, component: &str) -> TxResult<[u8; 32]> {
    if value.is_negative() {
        return Err(TransactionError::invalid_signature(format!(
            "{} is negative",
            component
        )));
    }
    let (_, bytes) = value.to_bytes_be();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    if bytes.len() > 32 {
        return Err(TransactionError::invalid_signature(format!(
            "{} is wider than 32 bytes",
            component
        )));
    }

    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
