use {
    thiserror::Error,
    vesting_ledger::{Amount, VestingError},
};

/// Errors produced by the chain read client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The address does not decode to exactly 20 bytes.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Connection failure, timeout or non-2xx HTTP status.
    #[error("Transport error talking to {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The node answered with a JSON-RPC error envelope.
    #[error("Remote error {code} ({context}): {message}")]
    Remote {
        code: i64,
        message: String,
        context: String,
    },

    /// The response is shorter than the fixed layout requires.
    #[error(
        "Short response for {layout}{}: expected {expected} bytes, got {actual}",
        context_suffix(.context)
    )]
    ShortResponse {
        layout: &'static str,
        expected: usize,
        actual: usize,
        context: String,
    },

    /// A response field could not be interpreted.
    #[error("Failed to decode {field}{}: {reason}", context_suffix(.context))]
    Decode {
        field: String,
        reason: String,
        context: String,
    },

    /// A value does not fit in a 256-bit word.
    #[error("Value {value} of {field} does not fit in a 256-bit word")]
    ValueOutOfRange { field: &'static str, value: Amount },

    /// Local ledger rejected mirrored state.
    #[error(transparent)]
    Ledger(#[from] VestingError),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether repeating the same request may succeed.
    ///
    /// Only transport failures qualify; everything else is deterministic for
    /// a given request and remote state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    pub(crate) fn decode(field: impl Into<String>, reason: impl ToString) -> Self {
        ClientError::Decode {
            field: field.into(),
            reason: reason.to_string(),
            context: String::new(),
        }
    }

    pub(crate) fn short_response(layout: &'static str, expected: usize, actual: usize) -> Self {
        ClientError::ShortResponse {
            layout,
            expected,
            actual,
            context: String::new(),
        }
    }

    /// Replace the context of a remote or decode error with call details.
    pub(crate) fn with_context(self, context: String) -> Self {
        match self {
            ClientError::Remote { code, message, .. } => ClientError::Remote {
                code,
                message,
                context,
            },
            ClientError::ShortResponse {
                layout,
                expected,
                actual,
                ..
            } => ClientError::ShortResponse {
                layout,
                expected,
                actual,
                context,
            },
            ClientError::Decode { field, reason, .. } => ClientError::Decode {
                field,
                reason,
                context,
            },
            other => other,
        }
    }
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" ({context})")
    }
}

/// Convenience result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
