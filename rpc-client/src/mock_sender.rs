//! A mock [`RpcSender`] that answers `eth_call` from canned responses.

use {
    crate::{
        error::{ClientError, Result},
        rpc_sender::{request_envelope, RpcSender},
    },
    serde_json::{json, Value},
    std::{
        collections::HashMap,
        sync::{Mutex, PoisonError},
    },
};

pub const MOCK_URL: &str = "mock://vesting";

/// A canned answer for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Raw return bytes, sent back as `0x`-prefixed hex.
    Bytes(Vec<u8>),
    /// A JSON-RPC error envelope.
    RemoteError { code: i64, message: String },
    /// A connection-level failure.
    TransportError(String),
}

/// Answers `eth_call` requests keyed by their call data.
///
/// Calls without a canned answer return empty bytes (`"0x"`), which is what
/// a node returns for a call to an account without code. Every request is
/// recorded.
#[derive(Debug, Default)]
pub struct MockSender {
    responses: HashMap<Vec<u8>, MockResponse>,
    requests: Mutex<Vec<Value>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls whose data equals `call_data` with `response`.
    pub fn with_response(mut self, call_data: Vec<u8>, response: MockResponse) -> Self {
        self.responses.insert(call_data, response);
        self
    }

    pub fn with_bytes(self, call_data: Vec<u8>, bytes: Vec<u8>) -> Self {
        self.with_response(call_data, MockResponse::Bytes(bytes))
    }

    /// Every request sent so far, as full JSON-RPC envelopes.
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn call_data(params: &Value) -> Result<Vec<u8>> {
        let data = params
            .get(0)
            .and_then(|call| call.get("data"))
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::decode("eth_call params", "missing data"))?;
        hex::decode(data.trim_start_matches("0x"))
            .map_err(|e| ClientError::decode("eth_call params", e))
    }
}

impl RpcSender for MockSender {
    fn send(&self, method: &str, params: Value) -> Result<Value> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request_envelope(1, method, params.clone()));

        if method != "eth_call" {
            return Err(ClientError::Remote {
                code: -32601,
                message: "Method not found".to_string(),
                context: method.to_string(),
            });
        }

        match self.responses.get(&Self::call_data(&params)?) {
            None => Ok(json!("0x")),
            Some(MockResponse::Bytes(bytes)) => Ok(json!(format!("0x{}", hex::encode(bytes)))),
            Some(MockResponse::RemoteError { code, message }) => Err(ClientError::Remote {
                code: *code,
                message: message.clone(),
                context: method.to_string(),
            }),
            Some(MockResponse::TransportError(reason)) => Err(ClientError::Transport {
                url: MOCK_URL.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    fn url(&self) -> String {
        MOCK_URL.to_string()
    }
}
