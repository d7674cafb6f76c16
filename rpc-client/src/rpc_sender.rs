//! Transport seam for JSON-RPC requests.

use {
    crate::error::{ClientError, Result},
    serde_json::Value,
};

/// Sends one JSON-RPC request and returns its `result` member.
///
/// Implementations must be stateless between calls so a single sender can
/// serve concurrent queries.
pub trait RpcSender: Send + Sync {
    fn send(&self, method: &str, params: Value) -> Result<Value>;

    /// Endpoint description for logs and errors.
    fn url(&self) -> String;
}

/// Build a JSON-RPC 2.0 request envelope.
pub fn request_envelope(id: u64, method: &str, params: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Extract `result` from a response envelope, or surface its `error`.
pub fn parse_response_envelope(method: &str, mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let mut message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        if let Some(data) = error.get("data").filter(|d| !d.is_null()) {
            message = format!("{message} [data: {data}]");
        }
        return Err(ClientError::Remote {
            code,
            message,
            context: method.to_string(),
        });
    }

    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ClientError::decode(
            "response",
            format!("{method} response has neither result nor error"),
        )),
    }
}
