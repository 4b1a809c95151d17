//! # Protocol Configuration & Constants
//!
//! Every magic number the EVM envelope depends on lives here. The routing
//! key and type tag are part of the host dispatch contract and the `v`
//! offsets are part of every signature ever produced, so treat the values
//! below as frozen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Message Routing
// ---------------------------------------------------------------------------

/// Routing key the host dispatcher uses to hand the envelope to the EVM
/// module's handler.
pub const ROUTER_KEY: &str = "evm";

/// Type tag of the Ethereum transaction message.
pub const TYPE_MSG_ETHEREUM_TX: &str = "ethereum_tx";

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Chain id 0 means "no replay protection": pre-EIP-155 signing payload and
/// `v ∈ {27, 28}`.
pub const CHAIN_ID_UNPROTECTED: u64 = 0;

/// Ethereum mainnet.
pub const CHAIN_ID_MAINNET: u64 = 1;

/// Ropsten. Still the chain id most old test vectors are signed for.
pub const CHAIN_ID_ROPSTEN: u64 = 3;

/// Local development chains (ganache, hardhat, anvil all default here).
pub const CHAIN_ID_DEVNET: u64 = 1337;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Secret key length in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Uncompressed public key length, including the `0x04` prefix byte.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Recoverable signature length: r (32) ‖ s (32) ‖ recovery id (1).
pub const SIGNATURE_LENGTH: usize = 65;

/// Account address length. Last 20 bytes of keccak256(pubkey).
pub const ADDRESS_LENGTH: usize = 20;

/// Keccak-256 output length.
pub const HASH_LENGTH: usize = 32;

/// `v = recovery_id + 27` for unprotected (legacy) signatures.
pub const LEGACY_V_OFFSET: u64 = 27;

/// `v = recovery_id + 35 + 2 * chain_id` for EIP-155 signatures.
pub const EIP155_V_OFFSET: u64 = 35;

/// Number of RLP items in the wire encoding: six base fields plus v, r, s.
pub const WIRE_FIELD_COUNT: usize = 9;

/// Number of base fields shared by the wire and sign-payload encodings.
pub const BASE_FIELD_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Chain Configuration
// ---------------------------------------------------------------------------

/// Errors raised while loading a [`ChainConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chain config format: {details}")]
    InvalidFormat { details: String },

    #[error("chain config validation failed: {reason}")]
    ValidationFailed { reason: String },
}

/// The chain an embedding node signs and verifies envelopes for.
///
/// Hosts usually carry this inside their own genesis/app config; it is
/// JSON-loadable so it can be lifted out of such a file directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EIP-155 chain id. `0` disables replay protection.
    pub chain_id: u64,
    /// Human-readable chain name, used in logs only.
    pub name: String,
}

impl ChainConfig {
    pub fn new(chain_id: u64, name: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
        }
    }

    /// Local development chain.
    pub fn devnet() -> Self {
        Self::new(CHAIN_ID_DEVNET, "devnet")
    }

    /// Parses and validates a JSON chain config.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidFormat {
                details: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Whether signatures produced under this config carry the chain id.
    pub fn is_replay_protected(&self) -> bool {
        self.chain_id != CHAIN_ID_UNPROTECTED
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "chain name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

/// Returns a friendly name for a chain id, mainly for logging.
pub fn chain_name(chain_id: u64) -> String {
    match chain_id {
        CHAIN_ID_UNPROTECTED => "unprotected".to_string(),
        CHAIN_ID_MAINNET => "mainnet".to_string(),
        CHAIN_ID_ROPSTEN => "ropsten".to_string(),
        CHAIN_ID_DEVNET => "devnet".to_string(),
        other => format!("chain-{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids_are_distinct() {
        assert_ne!(CHAIN_ID_UNPROTECTED, CHAIN_ID_MAINNET);
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_ROPSTEN);
        assert_ne!(CHAIN_ID_ROPSTEN, CHAIN_ID_DEVNET);
    }

    #[test]
    fn test_v_offsets_do_not_overlap() {
        // Legacy v is 27 or 28; the smallest protected v (chain id 1) is 37.
        assert!(LEGACY_V_OFFSET + 1 < EIP155_V_OFFSET + 2 * CHAIN_ID_MAINNET);
    }

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SECRET_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 65);
        assert_eq!(UNCOMPRESSED_PUBLIC_KEY_LENGTH, 65);
        assert_eq!(ADDRESS_LENGTH, 20);
        assert_eq!(HASH_LENGTH, 32);
        assert_eq!(WIRE_FIELD_COUNT, BASE_FIELD_COUNT + 3);
    }

    #[test]
    fn test_chain_config_from_json() {
        let config = ChainConfig::from_json(r#"{"chain_id": 3, "name": "ropsten"}"#).unwrap();
        assert_eq!(config.chain_id, CHAIN_ID_ROPSTEN);
        assert!(config.is_replay_protected());
    }

    #[test]
    fn test_chain_config_rejects_empty_name() {
        let err = ChainConfig::from_json(r#"{"chain_id": 3, "name": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }

    #[test]
    fn test_chain_config_rejects_garbage() {
        let err = ChainConfig::from_json("chain_id = 3").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { .. }));
    }

    #[test]
    fn test_unprotected_chain_config() {
        let config = ChainConfig::new(CHAIN_ID_UNPROTECTED, "legacy");
        assert!(!config.is_replay_protected());
        assert_eq!(ChainConfig::default(), ChainConfig::devnet());
    }

    #[test]
    fn test_chain_name_formatting() {
        assert_eq!(chain_name(CHAIN_ID_MAINNET), "mainnet");
        assert_eq!(chain_name(CHAIN_ID_UNPROTECTED), "unprotected");
        assert_eq!(chain_name(9000), "chain-9000");
    }
}
