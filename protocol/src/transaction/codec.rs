//! Generic ledger codec: how the host stores and relays the envelope.
//!
//! Separate from the RLP wire format. Binary is `bincode`, text is JSON.
//! Both preserve `None` vs `Some(0)` for every big integer, which RLP cannot.

use super::error::TxResult;
use super::msg::MsgEthereumTx;

impl MsgEthereumTx {
    pub fn to_binary(&self) -> TxResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_binary(bytes: &[u8]) -> TxResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn to_json(&self) -> TxResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> TxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
