//! Per-network parameters used when deriving keys and signing.

use okchain_core::constants::{
    ACCOUNT_HRP, DEFAULT_CHAIN_ID, DEFAULT_DEC_PRECISION, OKCHAIN_COIN_TYPE, VALIDATOR_HRP,
};
use okchain_core::Fee;
use serde::{Deserialize, Serialize};

use crate::keys::HdPath;

/// Network identity and encoding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: String,
    pub account_hrp: String,
    pub validator_hrp: String,
    pub coin_type: u32,
    pub fee: Fee,
    /// Fractional digits of the chain's `Dec`. Amounts, prices and
    /// quantities are scaled by 10^`dec_precision` in the binary envelope.
    pub dec_precision: usize,
}

impl ChainConfig {
    /// Derivation path of account `index` on this network.
    pub fn hd_path(&self, index: u32) -> HdPath {
        HdPath::new(self.coin_type, 0, index)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            account_hrp: ACCOUNT_HRP.to_string(),
            validator_hrp: VALIDATOR_HRP.to_string(),
            coin_type: OKCHAIN_COIN_TYPE,
            fee: Fee::default(),
            dec_precision: DEFAULT_DEC_PRECISION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.chain_id, "okchain");
        assert_eq!(config.account_hrp, "okchain");
        assert_eq!(config.hd_path(3).to_string(), "m/44'/996'/0'/0/3");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ChainConfig = serde_json::from_str(r#"{"chain_id":"okchain-testnet"}"#).unwrap();
        assert_eq!(config.chain_id, "okchain-testnet");
        assert_eq!(config.fee, Fee::default());
        assert_eq!(config.dec_precision, 8);
    }

    #[test]
    fn precision_overridable() {
        let config: ChainConfig = serde_json::from_str(r#"{"dec_precision":18}"#).unwrap();
        assert_eq!(config.dec_precision, 18);
        assert_eq!(config.chain_id, "okchain");
    }
}
