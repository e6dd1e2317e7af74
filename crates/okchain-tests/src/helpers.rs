//! Shared helpers for the integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Once;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use okchain_core::constants::ACCOUNT_HRP;
use okchain_core::error::TransportError;
use okchain_rpc::{Client, ClientConfig, Transport};
use okchain_wallet::{AccountInfo, AddressInfo};
use serde_json::{Value, json};

pub const ENDPOINT: &str = "http://scripted-node:26657";

/// The standard BIP-39 test phrase.
pub const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Address of [`MNEMONIC`] at `m/44'/996'/0'/0/0`.
pub const MNEMONIC_ADDRESS: &str = "okchain1p9emjz06eq2r5r89hap80m4yymccuwxpnwmmkh";

/// A valid account address that belongs to no test key.
pub const RECIPIENT: &str = "okchain1t2cvfv58764q4wdly7qjx5d2z89lewvwq2448n";

/// One request as the transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: String,
    pub params: Value,
}

impl RecordedCall {
    /// The ABCI `data` member, hex-decoded and parsed as JSON.
    pub fn abci_data(&self) -> Option<Value> {
        let hex_data = self.params.get("data")?.as_str()?;
        let bytes = hex::decode(hex_data).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// The broadcast `tx` member, base64-decoded.
    pub fn tx_bytes(&self) -> Option<Vec<u8>> {
        let encoded = self.params.get("tx")?.as_str()?;
        STANDARD.decode(encoded).ok()
    }
}

enum Reply {
    Body(Vec<u8>),
    Fail(TransportError),
}

/// Replays scripted responses in order and records each request.
///
/// Each scripted reply names the method it expects; a request for any
/// other method, or one beyond the end of the script, panics.
#[derive(Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<(String, Reply)>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &str, body: Value) -> &Self {
        self.reply_raw(method, body.to_string().into_bytes())
    }

    pub fn reply_raw(&self, method: &str, body: Vec<u8>) -> &Self {
        self.script
            .borrow_mut()
            .push_back((method.to_string(), Reply::Body(body)));
        self
    }

    pub fn fail(&self, method: &str, error: TransportError) -> &Self {
        self.script
            .borrow_mut()
            .push_back((method.to_string(), Reply::Fail(error)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("no call recorded")
    }

    /// Scripted replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.script.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn call(&self, endpoint: &str, method: &str, params: &Value) -> Result<Vec<u8>, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            params: params.clone(),
        });
        let (expected, reply) = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted call to {method}"));
        assert_eq!(expected, method, "scripted reply was for a different method");
        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Fail(error) => Err(error),
        }
    }
}

/// A client bound to [`ENDPOINT`] over `transport`.
pub fn scripted_client(transport: &ScriptedTransport) -> Client<&ScriptedTransport> {
    Client::with_transport(ClientConfig::new(ENDPOINT), transport)
}

/// A deterministic account whose private key is the scalar `seed`.
pub fn test_account(seed: u8, account_number: u64, sequence: u64) -> AccountInfo {
    let info = AddressInfo::from_private_key_hex(&format!("{seed:064x}"), ACCOUNT_HRP)
        .expect("nonzero seed is a valid key");
    AccountInfo::new(info, account_number, sequence)
}

// ---------------------------------------------------------------------------
// Canned node responses
// ---------------------------------------------------------------------------

/// A successful `abci_query` whose value is `payload` as JSON.
pub fn abci_value(payload: &Value) -> Value {
    let encoded = STANDARD.encode(payload.to_string());
    json!({"jsonrpc": "2.0", "id": 1, "result": {"response": {"value": encoded, "height": "100"}}})
}

/// A failed `abci_query`.
pub fn abci_failure(code: u32, log: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": {"response": {"code": code, "log": log, "codespace": "sdk"}}})
}

/// The amino JSON of an account with the given counters.
pub fn account_response(address: &str, account_number: u64, sequence: u64) -> Value {
    abci_value(&json!({
        "type": "okchain/Account",
        "value": {
            "account_number": account_number.to_string(),
            "address": address,
            "coins": [{"amount": "100.00000000", "denom": "okb"}],
            "public_key": null,
            "sequence": sequence.to_string()
        }
    }))
}

/// A direct-method success.
pub fn node_result(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

/// A JSON-RPC error object.
pub fn node_error(code: i64, message: &str, data: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": message, "data": data}})
}

/// `broadcast_tx_commit` where both stages pass.
pub fn commit_ok(hash: &str, height: u64) -> Value {
    node_result(json!({
        "check_tx": {"gasWanted": "200000", "gasUsed": "41000"},
        "deliver_tx": {"gasWanted": "200000", "gasUsed": "52000", "log": "[]"},
        "hash": hash,
        "height": height.to_string()
    }))
}

/// `broadcast_tx_commit` rejected at `stage` (`check_tx` or `deliver_tx`).
pub fn commit_failed(stage: &str, code: u32, log: &str) -> Value {
    let mut result = json!({
        "check_tx": {},
        "deliver_tx": {},
        "hash": "00",
        "height": "0"
    });
    result[stage] = json!({"code": code, "log": log});
    node_result(result)
}

/// `broadcast_tx_sync` / `broadcast_tx_async` reply.
pub fn sync_reply(code: u32, log: &str, hash: &str) -> Value {
    node_result(json!({"code": code, "data": "", "hash": hash, "log": log}))
}

/// Opt-in log output: `RUST_LOG=okchain_rpc=debug cargo test`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
