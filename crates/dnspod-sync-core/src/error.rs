//! Error types for dnspod-sync
//!
//! Two kinds of failure exist: validation errors raised before any network
//! call, and remote errors from the DNS provider or the proxy reload endpoint.

use thiserror::Error;

/// Result type alias for dnspod-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Required input missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Non-2xx HTTP status from the DNS provider
    #[error("DNSPod API {endpoint} failed with {status}")]
    HttpStatus {
        /// Endpoint path, e.g. `/Record.List`
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Provider-level failure embedded in a successful HTTP response
    #[error("DNSPod API {endpoint} error: {message}")]
    Api {
        /// Endpoint path, e.g. `/Record.List`
        endpoint: String,
        /// Provider message, or "Unknown error"
        message: String,
    },

    /// The request never produced a response (connect, TLS, timeout)
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status from the proxy reload endpoint
    #[error("Traefik reload failed with status {status}")]
    Reload {
        /// HTTP status code
        status: u16,
    },
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a provider-level API error
    pub fn api(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error for a provider endpoint
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether the error came from a remote call rather than local input
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Api { .. } | Self::Transport(_) | Self::Reload { .. }
        )
    }
}
