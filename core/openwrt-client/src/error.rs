//! Device client error types.

use thiserror::Error;

/// Result type for device client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to a device.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request ran past its deadline, or ubus reported a timeout.
    #[error("request timed out")]
    Timeout,

    /// Object, file or config section does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Session lacks access, or has expired.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Login rejected.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Non-zero ubus status without a dedicated variant.
    #[error("ubus call {object}.{method} failed with status {code}")]
    Status {
        object: String,
        method: String,
        code: i64,
    },

    /// JSON-RPC level error from rpcd.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Unexpected HTTP status or response shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection settings cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if the device reported that the requested object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Returns true if the request ran past the client's deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Timeout => true,
            ClientError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
