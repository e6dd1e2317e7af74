//! The client handle: node queries, account refresh and broadcast.
//!
//! A [`Client`] is bound to one endpoint at construction and holds no
//! mutable state. Account counters live in the caller's [`AccountInfo`];
//! refresh it with [`Client::refresh_account`] after every broadcast and
//! before signing the next transaction. Submissions for one account must be
//! serialized by the caller.

use okchain_core::error::{OkchainError, TransportError};
use okchain_core::PrivateKey;
use okchain_wallet::{AccountInfo, AddressInfo, SignedTransaction, TransactionBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{BroadcastMode, ClientConfig};
use crate::decode::{
    decode_abci_response, decode_broadcast_response, decode_node_response, QueryResult,
};
use crate::params::{
    AbciQueryParams, BlockParams, BroadcastTxParams, TxParams, ValidatorsParams,
    METHOD_ABCI_QUERY, METHOD_BLOCK, METHOD_TX, METHOD_VALIDATORS,
};
use crate::query::{
    self, AbciQuery, DealsQuery, MatchesQuery, OrderListQuery, TokenShow, TransactionsQuery,
};
use crate::transport::{parse_body, HttpTransport, Transport};

/// On-chain counters of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    pub account_number: u64,
    pub sequence: u64,
}

impl AccountState {
    /// Read the counters from an amino account, `{"type", "value": {..}}`,
    /// or from a bare value object.
    pub fn from_account_json(account: &Value) -> Result<Self, OkchainError> {
        let value = account.get("value").unwrap_or(account);
        Ok(Self {
            account_number: counter(value, "account_number")?,
            sequence: counter(value, "sequence")?,
        })
    }
}

fn counter(value: &Value, field: &str) -> Result<u64, OkchainError> {
    let parsed = match value.get(field) {
        Some(Value::String(s)) => s.parse().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| OkchainError::Decode(format!("account without a valid {field}")))
}

/// Handle to one OKChain node.
pub struct Client<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<HttpTransport> {
    /// Connect over HTTP using the configured endpoint and timeout.
    pub fn new(config: ClientConfig) -> Result<Self, OkchainError> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Client<T> {
    /// Use a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A builder for this client's chain.
    pub fn builder(&self) -> TransactionBuilder {
        TransactionBuilder::new(self.config.chain.clone())
    }

    fn call<P: Serialize>(&self, method: &str, params: &P) -> Result<Value, OkchainError> {
        let params =
            serde_json::to_value(params).map_err(|e| TransportError::Encode(e.to_string()))?;
        let body = self
            .transport
            .call(&self.config.endpoint, method, &params)
            .inspect_err(|e| warn!(method, error = %e, "rpc call failed"))?;
        debug!(
            method,
            endpoint = %self.config.endpoint,
            response_bytes = body.len(),
            "rpc body received"
        );
        Ok(parse_body(&body)?)
    }

    fn log_failure(method: &str, result: &QueryResult) {
        if !result.is_success() {
            warn!(
                method,
                code = result.code(),
                detail = result.detail_message().unwrap_or_default(),
                "node reported failure"
            );
        }
    }

    /// Run a path-addressed query.
    pub fn abci_query(&self, query: &AbciQuery) -> Result<QueryResult, OkchainError> {
        debug!(path = %query.path, "abci query");
        let body = self.call(METHOD_ABCI_QUERY, &AbciQueryParams::from(query))?;
        let result = decode_abci_response(&body)?;
        Self::log_failure(METHOD_ABCI_QUERY, &result);
        Ok(result)
    }

    fn node_query<P: Serialize>(&self, method: &str, params: &P) -> Result<QueryResult, OkchainError> {
        let body = self.call(method, params)?;
        let result = decode_node_response(&body)?;
        Self::log_failure(method, &result);
        Ok(result)
    }

    // ── ABCI queries ───────────────────────────────────────────────────────

    pub fn account(&self, address: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::account(address)?)
    }

    pub fn account_tokens(&self, address: &str, show: TokenShow) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::account_tokens(address, show)?)
    }

    pub fn account_token(&self, address: &str, symbol: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::account_token(address, symbol)?)
    }

    pub fn tokens(&self) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::tokens())
    }

    pub fn token(&self, symbol: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::token(symbol)?)
    }

    pub fn products(&self) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::products())
    }

    pub fn depth_book(&self, product: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::depth_book(product)?)
    }

    pub fn candles(&self, granularity: &str, product: &str, size: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::candles(granularity, product, size)?)
    }

    pub fn tickers(&self, count: &str) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::tickers(count)?)
    }

    pub fn matches(&self, params: &MatchesQuery) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::matches(params)?)
    }

    pub fn open_orders(&self, params: &OrderListQuery) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::open_orders(params)?)
    }

    pub fn closed_orders(&self, params: &OrderListQuery) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::closed_orders(params)?)
    }

    pub fn deals(&self, params: &DealsQuery) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::deals(params)?)
    }

    pub fn transactions(&self, params: &TransactionsQuery) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::transactions(params)?)
    }

    pub fn proposals(&self) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::proposals()?)
    }

    pub fn proposal(&self, id: u64) -> Result<QueryResult, OkchainError> {
        self.abci_query(&query::proposal(id)?)
    }

    // ── Direct node queries ────────────────────────────────────────────────

    pub fn latest_block(&self) -> Result<QueryResult, OkchainError> {
        self.node_query(METHOD_BLOCK, &BlockParams::latest())
    }

    pub fn block(&self, height: u64) -> Result<QueryResult, OkchainError> {
        self.node_query(METHOD_BLOCK, &BlockParams::at(height))
    }

    /// Look up a transaction by its hex hash.
    pub fn tx(&self, hash: &str, prove: bool) -> Result<QueryResult, OkchainError> {
        let hash = hash.trim();
        if hash.is_empty() {
            return Err(OkchainError::missing("hash"));
        }
        let bytes = hex::decode(hash).map_err(|e| OkchainError::invalid("hash", e.to_string()))?;
        self.node_query(METHOD_TX, &TxParams::new(&bytes, prove))
    }

    pub fn validators(&self) -> Result<QueryResult, OkchainError> {
        self.node_query(METHOD_VALIDATORS, &ValidatorsParams::default())
    }

    // ── Accounts ───────────────────────────────────────────────────────────

    /// Current account number and sequence of `address`.
    pub fn account_state(&self, address: &str) -> Result<AccountState, OkchainError> {
        let account = self.account(address)?.into_json()?;
        AccountState::from_account_json(&account)
    }

    /// Signing context for a hex private key, counters read from the chain.
    pub fn account_info(&self, private_key_hex: &str) -> Result<AccountInfo, OkchainError> {
        let key = PrivateKey::from_hex(private_key_hex)?;
        self.account_info_for_key(key)
    }

    /// Signing context for the first key of `mnemonic` on this chain.
    pub fn account_info_from_mnemonic(&self, mnemonic: &str) -> Result<AccountInfo, OkchainError> {
        let chain = &self.config.chain;
        let info = AddressInfo::from_mnemonic(mnemonic, chain.hd_path(0), &chain.account_hrp)?;
        self.account_info_for_address(info)
    }

    fn account_info_for_key(&self, key: PrivateKey) -> Result<AccountInfo, OkchainError> {
        let info = AddressInfo::from_private_key(key, &self.config.chain.account_hrp)?;
        self.account_info_for_address(info)
    }

    fn account_info_for_address(&self, info: AddressInfo) -> Result<AccountInfo, OkchainError> {
        let state = self.account_state(info.address().as_str())?;
        Ok(AccountInfo::new(info, state.account_number, state.sequence))
    }

    /// Re-read the counters of `account` from the chain.
    pub fn refresh_account(&self, account: &mut AccountInfo) -> Result<(), OkchainError> {
        let state = self.account_state(account.address().as_str())?;
        debug!(
            address = %account.address(),
            account_number = state.account_number,
            sequence = state.sequence,
            "account refreshed"
        );
        account.update_counters(state.account_number, state.sequence);
        Ok(())
    }

    // ── Submission ─────────────────────────────────────────────────────────

    /// Submit a signed transaction in `mode`.
    ///
    /// A nonzero check or deliver code comes back as a failure result, never
    /// as success. The caller must refresh the account before signing again.
    pub fn broadcast(
        &self,
        tx: &SignedTransaction,
        mode: BroadcastMode,
    ) -> Result<QueryResult, OkchainError> {
        let bytes = tx.encode()?;
        info!(mode = %mode, tx_bytes = bytes.len(), "broadcasting transaction");
        let body = self.call(mode.method(), &BroadcastTxParams::new(&bytes))?;
        let result = decode_broadcast_response(&body, mode)?;
        Self::log_failure(mode.method(), &result);
        Ok(result)
    }

    /// Submit using the configured default mode.
    pub fn broadcast_default(&self, tx: &SignedTransaction) -> Result<QueryResult, OkchainError> {
        self.broadcast(tx, self.config.broadcast_mode)
    }
}
