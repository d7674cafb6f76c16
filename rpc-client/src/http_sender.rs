//! Blocking HTTP transport.

use {
    crate::{
        config::DEFAULT_TIMEOUT_MS,
        error::{ClientError, Result},
        rpc_sender::{parse_response_envelope, request_envelope, RpcSender},
    },
    log::debug,
    reqwest::{blocking::Client, header},
    serde_json::Value,
    std::time::Duration,
};

/// [`RpcSender`] that posts JSON-RPC requests over HTTP(S).
///
/// Every request carries the configured timeout; a timeout surfaces as
/// [`ClientError::Transport`].
#[derive(Debug, Clone)]
pub struct HttpSender {
    client: Client,
    url: String,
}

impl HttpSender {
    /// Create a sender with the default 30 second timeout.
    pub fn new<U: ToString>(url: U) -> Result<Self> {
        Self::new_with_timeout(url, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn new_with_timeout<U: ToString>(url: U, timeout: Duration) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.append(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .pool_idle_timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    fn transport_error(&self, reason: impl ToString) -> ClientError {
        ClientError::Transport {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RpcSender for HttpSender {
    fn send(&self, method: &str, params: Value) -> Result<Value> {
        let request = request_envelope(1, method, params);
        debug!("{} -> {}", method, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.transport_error(format!("HTTP status {status}")));
        }

        let body: Value = response
            .json()
            .map_err(|e| ClientError::decode("response body", e))?;
        parse_response_envelope(method, body)
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
