//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use okchain_core::error::OkchainError;
use okchain_wallet::ChainConfig;
use serde::{Deserialize, Serialize};

use crate::params::{METHOD_BROADCAST_ASYNC, METHOD_BROADCAST_COMMIT, METHOD_BROADCAST_SYNC};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:26657";

pub const ENV_ENDPOINT: &str = "OKCHAIN_RPC_ENDPOINT";
pub const ENV_BROADCAST_MODE: &str = "OKCHAIN_BROADCAST_MODE";
pub const ENV_CHAIN_ID: &str = "OKCHAIN_CHAIN_ID";
pub const ENV_TIMEOUT_SECS: &str = "OKCHAIN_RPC_TIMEOUT_SECS";

/// How long a broadcast waits before the node answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Wait until the transaction is committed in a block.
    #[default]
    Block,
    /// Wait for the mempool validity check only.
    Sync,
    /// Return as soon as the node has the bytes.
    Async,
}

impl BroadcastMode {
    /// The RPC method that submits in this mode.
    pub fn method(self) -> &'static str {
        match self {
            BroadcastMode::Block => METHOD_BROADCAST_COMMIT,
            BroadcastMode::Sync => METHOD_BROADCAST_SYNC,
            BroadcastMode::Async => METHOD_BROADCAST_ASYNC,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BroadcastMode::Block => "block",
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
        }
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BroadcastMode {
    type Err = OkchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(BroadcastMode::Block),
            "sync" => Ok(BroadcastMode::Sync),
            "async" => Ok(BroadcastMode::Async),
            other => Err(OkchainError::Config(format!(
                "unknown broadcast mode {other:?}, expected block, sync or async"
            ))),
        }
    }
}

/// Everything a [`crate::Client`] is bound to at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node JSON-RPC URL.
    pub endpoint: String,
    /// Mode used by `broadcast_default`.
    pub broadcast_mode: BroadcastMode,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub chain: ChainConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            broadcast_mode: BroadcastMode::default(),
            timeout_secs: None,
            chain: ChainConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, OkchainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OkchainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(mode) = lookup(ENV_BROADCAST_MODE) {
            config.broadcast_mode = mode.parse()?;
        }
        if let Some(chain_id) = lookup(ENV_CHAIN_ID) {
            config.chain.chain_id = chain_id;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                OkchainError::Config(format!("{ENV_TIMEOUT_SECS}={secs:?}: {e}"))
            })?;
            config.timeout_secs = Some(secs);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no client can work with.
    pub fn validate(&self) -> Result<(), OkchainError> {
        if self.endpoint.trim().is_empty() {
            return Err(OkchainError::Config("endpoint must not be empty".into()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(OkchainError::Config(format!(
                "endpoint {:?} must be an http(s) URL",
                self.endpoint
            )));
        }
        if self.chain.chain_id.trim().is_empty() {
            return Err(OkchainError::Config("chain_id must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn mode_methods() {
        assert_eq!(BroadcastMode::Block.method(), "broadcast_tx_commit");
        assert_eq!(BroadcastMode::Sync.method(), "broadcast_tx_sync");
        assert_eq!(BroadcastMode::Async.method(), "broadcast_tx_async");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("block".parse::<BroadcastMode>().unwrap(), BroadcastMode::Block);
        assert_eq!(" SYNC ".parse::<BroadcastMode>().unwrap(), BroadcastMode::Sync);
        let err = "commit".parse::<BroadcastMode>().unwrap_err();
        assert_eq!(err.kind(), okchain_core::ErrorKind::Config);
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_ENDPOINT, "https://node.example:26657"),
            (ENV_BROADCAST_MODE, "async"),
            (ENV_CHAIN_ID, "okchain-testnet"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "https://node.example:26657");
        assert_eq!(config.broadcast_mode, BroadcastMode::Async);
        assert_eq!(config.chain.chain_id, "okchain-testnet");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        for pairs in [
            [(ENV_BROADCAST_MODE, "eventually")],
            [(ENV_TIMEOUT_SECS, "soon")],
            [(ENV_ENDPOINT, "")],
            [(ENV_ENDPOINT, "tcp://127.0.0.1:26657")],
        ] {
            let err = ClientConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, OkchainError::Config(_)), "{pairs:?}");
        }
    }

    #[test]
    fn deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"endpoint":"http://10.0.0.1:26657","broadcast_mode":"sync"}"#)
                .unwrap();
        assert_eq!(config.broadcast_mode, BroadcastMode::Sync);
        assert_eq!(config.chain, ChainConfig::default());
    }
}
