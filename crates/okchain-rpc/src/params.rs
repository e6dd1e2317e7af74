//! Typed parameters, one struct per RPC method.
//!
//! Fields are declared in alphabetical order of their serialized names and
//! optional fields are omitted when absent, so serialized params are
//! reproducible byte for byte.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::query::AbciQuery;

pub const METHOD_ABCI_QUERY: &str = "abci_query";
pub const METHOD_BLOCK: &str = "block";
pub const METHOD_TX: &str = "tx";
pub const METHOD_VALIDATORS: &str = "validators";
pub const METHOD_BROADCAST_COMMIT: &str = "broadcast_tx_commit";
pub const METHOD_BROADCAST_SYNC: &str = "broadcast_tx_sync";
pub const METHOD_BROADCAST_ASYNC: &str = "broadcast_tx_async";

/// `abci_query`: `{data?, height: "0", path, prove: false}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AbciQueryParams {
    /// Uppercase hex of the JSON-encoded query data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub height: String,
    pub path: String,
    pub prove: bool,
}

impl From<&AbciQuery> for AbciQueryParams {
    fn from(query: &AbciQuery) -> Self {
        Self {
            data: query.data.as_deref().map(hex::encode_upper),
            height: "0".to_string(),
            path: query.path.clone(),
            prove: false,
        }
    }
}

/// `block`: latest block when `height` is absent.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl BlockParams {
    pub fn latest() -> Self {
        Self { height: None }
    }

    pub fn at(height: u64) -> Self {
        Self {
            height: Some(height.to_string()),
        }
    }
}

/// `tx`: the hash travels as base64 of its raw bytes.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub hash: String,
    pub prove: bool,
}

impl TxParams {
    pub fn new(hash_bytes: &[u8], prove: bool) -> Self {
        Self {
            hash: STANDARD.encode(hash_bytes),
            prove,
        }
    }
}

/// `validators`: current set when `height` is absent.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// `broadcast_tx_*`: base64 of the amino-encoded transaction.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BroadcastTxParams {
    pub tx: String,
}

impl BroadcastTxParams {
    pub fn new(tx_bytes: &[u8]) -> Self {
        Self {
            tx: STANDARD.encode(tx_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abci_params_hex_upper() {
        let query = AbciQuery::new("custom/acc/account", Some(br#"{"Address":"x"}"#.to_vec()));
        let json = serde_json::to_string(&AbciQueryParams::from(&query)).unwrap();
        assert_eq!(
            json,
            r#"{"data":"7B2241646472657373223A2278227D","height":"0","path":"custom/acc/account","prove":false}"#
        );
    }

    #[test]
    fn abci_params_without_data_omit_it() {
        let query = AbciQuery::new("custom/token/tokens", None);
        let json = serde_json::to_string(&AbciQueryParams::from(&query)).unwrap();
        assert_eq!(json, r#"{"height":"0","path":"custom/token/tokens","prove":false}"#);
    }

    #[test]
    fn block_params() {
        assert_eq!(serde_json::to_string(&BlockParams::latest()).unwrap(), "{}");
        assert_eq!(
            serde_json::to_string(&BlockParams::at(42)).unwrap(),
            r#"{"height":"42"}"#
        );
    }

    #[test]
    fn tx_params_base64_hash() {
        let params = TxParams::new(&[0xde, 0xad, 0xbe, 0xef], true);
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"hash":"3q2+7w==","prove":true}"#
        );
    }

    #[test]
    fn broadcast_params_base64() {
        let params = BroadcastTxParams::new(&[1, 2, 3]);
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"tx":"AQID"}"#);
    }
}
