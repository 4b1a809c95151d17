//! Transaction signing with secp256k1 recoverable signatures.
//!
//! Signing is a separate step from construction because the key may not be
//! available when the transaction is assembled (hardware wallet, remote
//! signer). The signed digest is [`TxData::sign_hash`] for the target chain,
//! so the signature commits to the chain id and cannot be replayed on
//! another chain.

use num_bigint::{BigInt, Sign};
use tracing::debug;

use super::error::TxResult;
use super::types::TxData;
use crate::config::{chain_name, EIP155_V_OFFSET, LEGACY_V_OFFSET};
use crate::crypto::keys::EthKeypair;
use crate::crypto::signatures::sign_prehash;

/// Signs `tx` in place for `chain_id`, overwriting any previous signature.
///
/// The signing procedure:
/// 1. Compute `keccak256(sign_payload(chain_id))`.
/// 2. Produce a recoverable secp256k1 signature `(r, s, recovery_id)` over it.
/// 3. Store `r` and `s` as unsigned integers and fold the recovery id into
///    `v`:
///    - `chain_id == 0`: `v = recovery_id + 27` (legacy, unprotected)
///    - otherwise:       `v = recovery_id + 35 + 2 * chain_id` (EIP-155)
///
/// # Errors
///
/// Fails with [`TransactionError::InvalidValue`](super::TransactionError::InvalidValue)
/// if a field cannot be encoded (negative amount or gas price). The
/// transaction is left untouched in that case.
///
/// # Example
///
/// ```rust,no_run
/// use nova_evm::crypto::{Address, EthKeypair};
/// use nova_evm::transaction::{sign_transaction, TxData};
///
/// let keypair = EthKeypair::generate();
/// let mut tx = TxData::new(0, Some(Address::ZERO), None, 21_000, None, Vec::new());
///
/// sign_transaction(&mut tx, 3, &keypair).unwrap();
/// assert_eq!(tx.chain_id(), Some(3));
/// ```
pub fn sign_transaction(tx: &mut TxData, chain_id: u64, keypair: &EthKeypair) -> TxResult<()> {
    let digest = tx.sign_hash(chain_id)?;
    let signature = sign_prehash(keypair, digest.as_bytes());

    let recovery_id = u64::from(signature.recovery_id);
    let v = if chain_id == 0 {
        BigInt::from(recovery_id + LEGACY_V_OFFSET)
    } else {
        // Computed in BigInt: 2 * chain_id overflows u64 for large ids.
        BigInt::from(recovery_id + EIP155_V_OFFSET) + BigInt::from(chain_id) * 2u32
    };

    tx.v = Some(v);
    tx.r = Some(BigInt::from_bytes_be(Sign::Plus, &signature.r));
    tx.s = Some(BigInt::from_bytes_be(Sign::Plus, &signature.s));

    debug!(
        chain_id,
        chain = %chain_name(chain_id),
        signer = %keypair.address(),
        sign_hash = %digest,
        "signed transaction"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
