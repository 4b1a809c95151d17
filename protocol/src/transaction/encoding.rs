//! Canonical RLP encoding of the field set, and the transaction hash.
//!
//! Two encodings share one field order:
//!
//! ```text
//! wire:          [nonce, price, gas_limit, recipient, amount, payload, v, r, s]
//! sign payload:  [nonce, price, gas_limit, recipient, amount, payload, chain_id, 0, 0]
//! sign payload (chain id 0):
//!                [nonce, price, gas_limit, recipient, amount, payload]
//! ```
//!
//! Integers are minimal big-endian byte strings (zero is the empty string),
//! the recipient is 20 bytes or the empty string, the payload is a raw byte
//! string. The chain-id-zero payload omits the trailing triple entirely
//! rather than encoding zeros: pre-EIP-155 signers hash exactly six items,
//! and changing that would invalidate every legacy signature.

use num_bigint::{BigInt, Sign};
use rlp::{DecoderError, Encodable, Rlp, RlpStream};
use tracing::trace;

use super::error::{TransactionError, TxResult};
use super::types::TxData;
use crate::config::{ADDRESS_LENGTH, BASE_FIELD_COUNT, WIRE_FIELD_COUNT};
use crate::crypto::{Address, TxHash};

/// Widest integer accepted from the wire (uint256).
const MAX_INTEGER_BYTES: usize = 32;

/// A byte string appended as a single RLP value.
struct RlpBytes<'a>(&'a [u8]);

impl Encodable for RlpBytes<'_> {
    fn rlp_append(&self, stream: &mut RlpStream) {
        stream.encoder().encode_value(self.0);
    }
}

impl TxData {
    /// Wire encoding: the full field set including v/r/s as currently set.
    pub fn rlp_bytes(&self) -> TxResult<Vec<u8>> {
        let mut stream = RlpStream::new_list(WIRE_FIELD_COUNT);
        self.append_base_fields(&mut stream)?;
        append_bigint(&mut stream, "v", self.v.as_ref())?;
        append_bigint(&mut stream, "r", self.r.as_ref())?;
        append_bigint(&mut stream, "s", self.s.as_ref())?;

        let out = stream.out().to_vec();
        trace!(len = out.len(), "encoded transaction");
        Ok(out)
    }

    /// Sign payload for `chain_id`. Never includes v/r/s.
    pub fn sign_payload(&self, chain_id: u64) -> TxResult<Vec<u8>> {
        let item_count = if chain_id == 0 {
            BASE_FIELD_COUNT
        } else {
            BASE_FIELD_COUNT + 3
        };

        let mut stream = RlpStream::new_list(item_count);
        self.append_base_fields(&mut stream)?;
        if chain_id != 0 {
            stream.append(&chain_id);
            stream.append(&0u64);
            stream.append(&0u64);
        }
        Ok(stream.out().to_vec())
    }

    /// Keccak-256 of the sign payload: the digest that gets signed.
    pub fn sign_hash(&self, chain_id: u64) -> TxResult<TxHash> {
        Ok(TxHash::of(&self.sign_payload(chain_id)?))
    }

    /// Keccak-256 of the wire encoding. Recomputed on every call; it changes
    /// whenever any field changes, signature included.
    pub fn hash(&self) -> TxResult<TxHash> {
        Ok(TxHash::of(&self.rlp_bytes()?))
    }

    /// Decodes exactly one nine-item RLP list. The result replaces any
    /// previous value wholesale; there is no in-place patching.
    pub fn decode_rlp(bytes: &[u8]) -> TxResult<Self> {
        let rlp = Rlp::new(bytes);
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }
        if rlp.payload_info()?.total() != bytes.len() {
            // Trailing bytes after the list.
            return Err(DecoderError::RlpInconsistentLengthAndData.into());
        }
        if rlp.item_count()? != WIRE_FIELD_COUNT {
            return Err(DecoderError::RlpIncorrectListLen.into());
        }

        let tx = TxData {
            nonce: decode_u64(&rlp.at(0)?)?,
            price: decode_bigint(&rlp.at(1)?, "price")?,
            gas_limit: decode_u64(&rlp.at(2)?)?,
            recipient: decode_recipient(&rlp.at(3)?)?,
            amount: decode_bigint(&rlp.at(4)?, "amount")?,
            payload: decode_data(&rlp.at(5)?)?.to_vec(),
            v: decode_bigint(&rlp.at(6)?, "v")?,
            r: decode_bigint(&rlp.at(7)?, "r")?,
            s: decode_bigint(&rlp.at(8)?, "s")?,
        };
        trace!(len = bytes.len(), "decoded transaction");
        Ok(tx)
    }

    fn append_base_fields(&self, stream: &mut RlpStream) -> TxResult<()> {
        stream.append(&self.nonce);
        append_bigint(stream, "price", self.price.as_ref())?;
        stream.append(&self.gas_limit);
        match &self.recipient {
            Some(to) => stream.append(&RlpBytes(to.as_bytes())),
            None => stream.append(&RlpBytes(&[])),
        };
        append_bigint(stream, "amount", self.amount.as_ref())?;
        stream.append(&RlpBytes(&self.payload));
        Ok(())
    }
}

/// Appends a non-negative big integer in minimal big-endian form. Absent and
/// zero both become the empty string.
fn append_bigint(
    stream: &mut RlpStream,
    field: &'static str,
    value: Option<&BigInt>,
) -> TxResult<()> {
    let Some(value) = value else {
        stream.append(&RlpBytes(&[]));
        return Ok(());
    };

    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus {
        return Err(TransactionError::InvalidValue {
            field,
            reason: "negative integers have no RLP encoding".to_string(),
        });
    }
    // `to_bytes_be` returns `[0]` for zero.
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    stream.append(&RlpBytes(&bytes[start..]));
    Ok(())
}

fn decode_data<'a>(item: &Rlp<'a>) -> TxResult<&'a [u8]> {
    if !item.is_data() {
        return Err(DecoderError::RlpExpectedToBeData.into());
    }
    // A single byte below 0x80 is its own encoding; `81 xx` is non-canonical.
    if let [0x81, byte] = item.as_raw() {
        if *byte < 0x80 {
            return Err(DecoderError::RlpInvalidIndirection.into());
        }
    }
    Ok(item.data()?)
}

fn decode_u64(item: &Rlp<'_>) -> TxResult<u64> {
    decode_data(item)?;
    Ok(item.as_val::<u64>()?)
}

fn decode_bigint(item: &Rlp<'_>, field: &'static str) -> TxResult<Option<BigInt>> {
    let data = decode_data(item)?;
    if data.is_empty() {
        return Ok(None);
    }
    if data[0] == 0 {
        return Err(TransactionError::MalformedField {
            field,
            reason: "integer has leading zero bytes".to_string(),
        });
    }
    if data.len() > MAX_INTEGER_BYTES {
        return Err(TransactionError::MalformedField {
            field,
            reason: format!("integer wider than {} bytes", MAX_INTEGER_BYTES),
        });
    }
    Ok(Some(BigInt::from_bytes_be(Sign::Plus, data)))
}

fn decode_recipient(item: &Rlp<'_>) -> TxResult<Option<Address>> {
    let data = decode_data(item)?;
    match data.len() {
        0 => Ok(None),
        ADDRESS_LENGTH => Ok(Some(Address::from_slice(data).map_err(|e| {
            TransactionError::MalformedField {
                field: "recipient",
                reason: e.to_string(),
            }
        })?)),
        other => Err(TransactionError::MalformedField {
            field: "recipient",
            reason: format!("expected 0 or {} bytes, got {}", ADDRESS_LENGTH, other),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::generate_address;

    const TEST_WIRE: &str =
        "E48080830186A0940000000000000000746573745F61646472657373808474657374808080";
    const TEST_HASH: &str = "E2AA2E68E7586AE9700F1D3D643330866B6AC2B6CA4C804F7C85ECB11D0B0B29";
    const TEST_SIGN_HASH_CHAIN_3: &str =
        "5BD30E35AD27449390B14C91E6BCFDCAADF8FE44EF33680E3BC200FC0DC083C7";

    fn test_tx() -> TxData {
        let addr = Address::from_bytes_left_padded(b"test_address");
        TxData::new(0, Some(addr), None, 100_000, None, b"test".to_vec())
    }

    #[test]
    fn wire_encoding_matches_vector() {
        let raw = test_tx().rlp_bytes().unwrap();
        assert_eq!(hex::encode_upper(raw), TEST_WIRE);
    }

    #[test]
    fn wire_decoding_matches_vector() {
        let raw = hex::decode(TEST_WIRE).unwrap();
        assert_eq!(TxData::decode_rlp(&raw).unwrap(), test_tx());
    }

    #[test]
    fn hash_matches_vector() {
        assert_eq!(test_tx().hash().unwrap().to_hex(), TEST_HASH);
    }

    #[test]
    fn sign_hash_matches_vector() {
        assert_eq!(
            test_tx().sign_hash(3).unwrap().to_hex(),
            TEST_SIGN_HASH_CHAIN_3
        );
    }

    #[test]
    fn empty_transaction_has_fixed_encoding() {
        let tx = TxData::new(0, None, None, 0, None, Vec::new());
        let raw = tx.rlp_bytes().unwrap();
        assert_eq!(hex::encode_upper(&raw), "C9808080808080808080");
        assert_eq!(TxData::decode_rlp(&raw).unwrap(), tx);
    }

    #[test]
    fn sign_payload_is_deterministic() {
        let tx = test_tx();
        assert_eq!(tx.sign_payload(3).unwrap(), tx.sign_payload(3).unwrap());
    }

    #[test]
    fn chain_id_appends_three_items() {
        let tx = test_tx();
        let legacy = tx.sign_payload(0).unwrap();
        let protected = tx.sign_payload(3).unwrap();

        let legacy_rlp = Rlp::new(&legacy);
        let protected_rlp = Rlp::new(&protected);
        assert_eq!(legacy_rlp.item_count().unwrap(), 6);
        assert_eq!(protected_rlp.item_count().unwrap(), 9);

        for i in 0..6 {
            assert_eq!(
                legacy_rlp.at(i).unwrap().as_raw(),
                protected_rlp.at(i).unwrap().as_raw()
            );
        }
        assert_eq!(protected_rlp.val_at::<u64>(6).unwrap(), 3);
        assert_eq!(protected_rlp.at(7).unwrap().as_raw(), &[0x80]);
        assert_eq!(protected_rlp.at(8).unwrap().as_raw(), &[0x80]);
    }

    #[test]
    fn sign_payload_ignores_signature() {
        let mut tx = test_tx();
        let before = tx.sign_payload(3).unwrap();
        tx.v = Some(BigInt::from(41));
        tx.r = Some(BigInt::from(7));
        tx.s = Some(BigInt::from(9));
        assert_eq!(tx.sign_payload(3).unwrap(), before);
    }

    #[test]
    fn full_roundtrip_with_signature_and_big_values() {
        let mut tx = TxData::new(
            u64::MAX,
            Some(generate_address()),
            Some(BigInt::from(10u64).pow(30)),
            21_000,
            Some(BigInt::from(1_000_000_000u64)),
            vec![0u8; 300],
        );
        tx.v = Some(BigInt::from(2_709u32));
        tx.r = Some(BigInt::from_bytes_be(Sign::Plus, &[0xAA; 32]));
        tx.s = Some(BigInt::from_bytes_be(Sign::Plus, &[0x01; 32]));

        let decoded = TxData::decode_rlp(&tx.rlp_bytes().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn contract_creation_roundtrips_to_none() {
        let tx = TxData::new(1, None, Some(BigInt::from(5)), 50_000, None, b"\x60\x80".to_vec());
        let decoded = TxData::decode_rlp(&tx.rlp_bytes().unwrap()).unwrap();
        assert_eq!(decoded.recipient(), None);
        assert_eq!(decoded, tx);
    }

    #[test]
    fn negative_amount_cannot_be_encoded() {
        let tx = TxData::new(0, None, Some(BigInt::from(-1)), 0, None, Vec::new());
        assert!(matches!(
            tx.rlp_bytes(),
            Err(TransactionError::InvalidValue { field: "amount", .. })
        ));
        assert!(tx.hash().is_err());
        assert!(tx.sign_payload(1).is_err());
    }

    #[test]
    fn hash_changes_with_any_field() {
        let base = test_tx();
        let base_hash = base.hash().unwrap();

        let mut other = base.clone();
        other.nonce = 1;
        assert_ne!(other.hash().unwrap(), base_hash);

        let mut other = base.clone();
        other.payload = b"tesT".to_vec();
        assert_ne!(other.hash().unwrap(), base_hash);

        let mut other = base.clone();
        other.v = Some(BigInt::from(27));
        assert_ne!(other.hash().unwrap(), base_hash);
    }

    #[test]
    fn hash_is_stable() {
        let tx = test_tx();
        assert_eq!(tx.hash().unwrap(), tx.hash().unwrap());
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut raw = hex::decode(TEST_WIRE).unwrap();
        raw.push(0x80);
        let err = TxData::decode_rlp(&raw).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn decode_rejects_wrong_arity() {
        let raw = test_tx().sign_payload(0).unwrap();
        assert_eq!(
            TxData::decode_rlp(&raw),
            Err(TransactionError::Decode(DecoderError::RlpIncorrectListLen))
        );
    }

    #[test]
    fn decode_rejects_non_list() {
        assert_eq!(
            TxData::decode_rlp(&[0x83, b'a', b'b', b'c']),
            Err(TransactionError::Decode(DecoderError::RlpExpectedToBeList))
        );
        assert!(TxData::decode_rlp(&[]).is_err());
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let raw = hex::decode(TEST_WIRE).unwrap();
        let err = TxData::decode_rlp(&raw[..raw.len() - 1]).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn decode_rejects_short_recipient() {
        let mut stream = RlpStream::new_list(WIRE_FIELD_COUNT);
        stream.append(&0u64);
        stream.append(&RlpBytes(&[]));
        stream.append(&0u64);
        stream.append(&RlpBytes(&[0x11; 19]));
        for _ in 0..5 {
            stream.append(&RlpBytes(&[]));
        }
        let err = TxData::decode_rlp(&stream.out()).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::MalformedField { field: "recipient", .. }
        ));
    }

    #[test]
    fn decode_rejects_leading_zero_integer() {
        let mut stream = RlpStream::new_list(WIRE_FIELD_COUNT);
        stream.append(&0u64);
        stream.append(&RlpBytes(&[0x00, 0x01]));
        for _ in 0..7 {
            stream.append(&RlpBytes(&[]));
        }
        let err = TxData::decode_rlp(&stream.out()).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::MalformedField { field: "price", .. }
        ));
    }

    #[test]
    fn decode_rejects_prefixed_single_byte_integer() {
        // amount written as `81 05` instead of `05`
        let raw = hex::decode("ca80808080810580808080").unwrap();
        assert_eq!(
            TxData::decode_rlp(&raw),
            Err(TransactionError::Decode(DecoderError::RlpInvalidIndirection))
        );
    }

    #[test]
    fn decode_rejects_prefixed_single_byte_payload() {
        let raw = hex::decode("ca80808080808105808080").unwrap();
        assert_eq!(
            TxData::decode_rlp(&raw),
            Err(TransactionError::Decode(DecoderError::RlpInvalidIndirection))
        );
    }

    #[test]
    fn single_byte_values_roundtrip_exactly() {
        for payload in [vec![0x05], vec![0x7F], vec![0x80], vec![0xFF]] {
            let tx = TxData::new(0, None, Some(BigInt::from(5)), 0, None, payload);
            let raw = tx.rlp_bytes().unwrap();
            let decoded = TxData::decode_rlp(&raw).unwrap();
            assert_eq!(decoded, tx);
            assert_eq!(decoded.rlp_bytes().unwrap(), raw);
        }
    }

    #[test]
    fn decode_rejects_nested_list_in_payload() {
        let mut stream = RlpStream::new_list(WIRE_FIELD_COUNT);
        for _ in 0..5 {
            stream.append(&RlpBytes(&[]));
        }
        stream.begin_list(0);
        for _ in 0..3 {
            stream.append(&RlpBytes(&[]));
        }
        let err = TxData::decode_rlp(&stream.out()).unwrap_err();
        assert_eq!(
            err,
            TransactionError::Decode(DecoderError::RlpExpectedToBeData)
        );
    }
}
