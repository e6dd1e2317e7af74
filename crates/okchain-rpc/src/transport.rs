//! JSON-RPC 2.0 transport.
//!
//! [`Transport`] is a single blocking `call(endpoint, method, params)` that
//! returns the raw response body. [`HttpTransport`] implements it over a
//! blocking `reqwest` client. There are no retries, and no timeout unless
//! one is configured.

use std::time::Duration;

use okchain_core::error::TransportError;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Every request carries the same id so that request bytes are reproducible.
pub const REQUEST_ID: u64 = 1;

/// Request envelope. Fields are declared alphabetically and `params` is a
/// `serde_json::Value` whose object keys serialize in sorted order, so the
/// whole body is byte-deterministic.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcRequest<'a> {
    pub id: u64,
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a Value) -> Self {
        Self {
            id: REQUEST_ID,
            jsonrpc: "2.0",
            method,
            params,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TransportError> {
        serde_json::to_vec(self).map_err(|e| TransportError::Encode(e.to_string()))
    }
}

/// One blocking JSON-RPC round trip.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// POST `method` with `params` to `endpoint` and return the response body.
    fn call(&self, endpoint: &str, method: &str, params: &Value) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, endpoint: &str, method: &str, params: &Value) -> Result<Vec<u8>, TransportError> {
        (**self).call(endpoint, method, params)
    }
}

/// Parse a response body as JSON. A body that is not JSON is a transport
/// failure, not a decode failure.
pub fn parse_body(body: &[u8]) -> Result<Value, TransportError> {
    serde_json::from_slice(body).map_err(|e| TransportError::MalformedBody(e.to_string()))
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `timeout: None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn call(&self, endpoint: &str, method: &str, params: &Value) -> Result<Vec<u8>, TransportError> {
        let body = RpcRequest::new(method, params).to_bytes()?;
        debug!(method, endpoint, request_bytes = body.len(), "rpc call");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| map_reqwest_error(method, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .map_err(|e| map_reqwest_error(method, e))?
            .to_vec();
        debug!(method, status = status.as_u16(), response_bytes = bytes.len(), "rpc response");

        // Tendermint answers some JSON-RPC errors with a 5xx status; the
        // error object still belongs to the response decoder.
        if !status.is_success() && !is_rpc_error_body(&bytes) {
            warn!(method, status = status.as_u16(), "rpc call rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes)
    }
}

fn is_rpc_error_body(body: &[u8]) -> bool {
    serde_json::from_slice::<Value>(body)
        .map(|v| v.get("error").is_some_and(|e| !e.is_null()))
        .unwrap_or(false)
}

fn map_reqwest_error(method: &str, e: reqwest::Error) -> TransportError {
    warn!(method, error = %e, "rpc transport failure");
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_members_sorted() {
        let params = json!({"path": "custom/acc/account", "height": "0", "data": "7B7D", "prove": false});
        let bytes = RpcRequest::new("abci_query", &params).to_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"id":1,"jsonrpc":"2.0","method":"abci_query","params":{"data":"7B7D","height":"0","path":"custom/acc/account","prove":false}}"#
        );
    }

    #[test]
    fn identical_requests_identical_bytes() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(
            RpcRequest::new("block", &a).to_bytes().unwrap(),
            RpcRequest::new("block", &b).to_bytes().unwrap()
        );
    }

    #[test]
    fn non_json_body_is_transport_error() {
        assert!(matches!(
            parse_body(b"<html>bad gateway</html>"),
            Err(TransportError::MalformedBody(_))
        ));
        assert!(parse_body(br#"{"result":{}}"#).is_ok());
    }

    #[test]
    fn rpc_error_body_detection() {
        assert!(is_rpc_error_body(br#"{"error":{"code":-32603}}"#));
        assert!(!is_rpc_error_body(br#"{"error":null,"result":{}}"#));
        assert!(!is_rpc_error_body(b"Internal Server Error"));
    }

    #[test]
    fn unreachable_endpoint_is_connection_error() {
        let transport = HttpTransport::new(Some(Duration::from_secs(2))).unwrap();
        let err = transport
            .call("http://127.0.0.1:9", "block", &json!({}))
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout
        ));
    }

    #[test]
    fn reference_forwards_to_inner() {
        let mut mock = MockTransport::new();
        mock.expect_call()
            .withf(|endpoint, method, _| endpoint == "http://node" && method == "validators")
            .times(1)
            .returning(|_, _, _| Ok(b"{}".to_vec()));
        let by_ref = &mock;
        assert_eq!(by_ref.call("http://node", "validators", &json!({})).unwrap(), b"{}");
    }
}
