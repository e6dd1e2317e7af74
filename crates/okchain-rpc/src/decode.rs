//! Response normalization.
//!
//! The node nests success and failure differently for the two request
//! families, so each has its own decoder:
//! - [`decode_abci_response`] for `abci_query`: the outcome lives in
//!   `result.response`, a `code` member marks failure and the payload is a
//!   base64 `value`
//! - [`decode_node_response`] for direct methods: a JSON-RPC `error` member
//!   marks failure and `result` is used as-is
//!
//! Both produce a [`QueryResult`] holding exactly one of data or detail.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use okchain_core::error::OkchainError;
use serde_json::Value;

use crate::config::BroadcastMode;

/// Code of every successful result.
pub const SUCCESS_CODE: &str = "0";

/// Code of a failure that carried no usable code of its own.
pub const UNKNOWN_CODE: &str = "unknown";

/// Payload of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl QueryData {
    /// Classify decoded bytes: JSON if they parse, else UTF-8 text, else raw.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return QueryData::Json(value);
        }
        match String::from_utf8(bytes) {
            Ok(text) => QueryData::Text(text),
            Err(e) => QueryData::Bytes(e.into_bytes()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            QueryData::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Result<Value, OkchainError> {
        match self {
            QueryData::Json(v) => Ok(v),
            QueryData::Text(t) => Err(OkchainError::Decode(format!("expected JSON, got text {t:?}"))),
            QueryData::Bytes(b) => Err(OkchainError::Decode(format!(
                "expected JSON, got {} raw bytes",
                b.len()
            ))),
        }
    }
}

/// Normalized outcome of any query or broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    code: String,
    data: Option<QueryData>,
    detail_message: Option<String>,
}

impl QueryResult {
    pub fn success(data: QueryData) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            data: Some(data),
            detail_message: None,
        }
    }

    /// A failure. In the unusual case of an empty detail, the code itself
    /// becomes the detail so the result never carries neither. A blank or
    /// success code is recorded as `"unknown"` so a failure never reads as
    /// success.
    pub fn failure(code: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut code = code.into();
        if code.trim().is_empty() || code == SUCCESS_CODE {
            code = UNKNOWN_CODE.to_string();
        }
        let mut detail = detail.into();
        if detail.is_empty() {
            detail = format!("failed with code {code}");
        }
        Self {
            code,
            data: None,
            detail_message: Some(detail),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn data(&self) -> Option<&QueryData> {
        self.data.as_ref()
    }

    pub fn detail_message(&self) -> Option<&str> {
        self.detail_message.as_deref()
    }

    /// The payload, or the failure as [`OkchainError::Chain`].
    pub fn into_data(self) -> Result<QueryData, OkchainError> {
        match (self.data, self.detail_message) {
            (Some(data), _) if self.code == SUCCESS_CODE => Ok(data),
            (_, detail) => Err(OkchainError::Chain {
                code: self.code,
                detail: detail.unwrap_or_default(),
            }),
        }
    }

    pub fn into_json(self) -> Result<Value, OkchainError> {
        self.into_data()?.into_json()
    }
}

/// Render a code member as a string. `None` for absent, null or zero codes.
fn nonzero_code(value: Option<&Value>) -> Option<String> {
    let code = match value? {
        Value::Null => return None,
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    (code != SUCCESS_CODE && !code.is_empty()).then_some(code)
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A non-null JSON-RPC `error` member becomes a failure result.
fn rpc_error(body: &Value) -> Option<QueryResult> {
    let error = body.get("error").filter(|e| !e.is_null())?;
    let code = nonzero_code(error.get("code")).unwrap_or_else(|| UNKNOWN_CODE.to_string());
    let detail = text_of(error.get("data"))
        .or_else(|| text_of(error.get("message")))
        .or_else(|| text_of(Some(error)))
        .unwrap_or_default();
    Some(QueryResult::failure(code, detail))
}

/// Decode an `abci_query` response body.
pub fn decode_abci_response(body: &Value) -> Result<QueryResult, OkchainError> {
    if let Some(failure) = rpc_error(body) {
        return Ok(failure);
    }
    let response = body
        .get("result")
        .and_then(|r| r.get("response"))
        .filter(|r| r.is_object())
        .ok_or_else(|| OkchainError::Decode("abci response without result.response".into()))?;

    if let Some(code) = nonzero_code(response.get("code")) {
        let detail = text_of(response.get("log"))
            .or_else(|| text_of(response.get("info")))
            .unwrap_or_default();
        return Ok(QueryResult::failure(code, detail));
    }

    let encoded = response
        .get("value")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OkchainError::Decode("abci response without value".into()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| OkchainError::Decode(format!("abci value is not base64: {e}")))?;
    if bytes.is_empty() {
        return Err(OkchainError::Decode("abci value decodes to nothing".into()));
    }
    Ok(QueryResult::success(QueryData::from_bytes(bytes)))
}

/// Decode the response of a direct node method (`block`, `tx`, `validators`).
pub fn decode_node_response(body: &Value) -> Result<QueryResult, OkchainError> {
    if let Some(failure) = rpc_error(body) {
        return Ok(failure);
    }
    match body.get("result") {
        None | Some(Value::Null) => Err(OkchainError::Decode(
            "node response without result or error".into(),
        )),
        Some(result) => Ok(QueryResult::success(QueryData::Json(result.clone()))),
    }
}

/// Decode a `broadcast_tx_*` response. On top of the direct-node rule, a
/// nonzero check or deliver code inside `result` is a chain failure.
pub fn decode_broadcast_response(
    body: &Value,
    mode: BroadcastMode,
) -> Result<QueryResult, OkchainError> {
    let decoded = decode_node_response(body)?;
    let Some(result) = decoded.data().and_then(QueryData::as_json) else {
        return Ok(decoded);
    };
    let stages: &[&str] = match mode {
        BroadcastMode::Block => &["check_tx", "deliver_tx"],
        BroadcastMode::Sync | BroadcastMode::Async => &[""],
    };
    for stage in stages {
        let section = if stage.is_empty() { Some(result) } else { result.get(*stage) };
        let Some(section) = section else { continue };
        if let Some(code) = nonzero_code(section.get("code")) {
            let detail = text_of(section.get("log"))
                .or_else(|| text_of(section.get("info")))
                .unwrap_or_default();
            return Ok(QueryResult::failure(code, detail));
        }
    }
    Ok(decoded)
}
