//! Error types for chain-reader

use alloy_transport::{RpcError, TransportError};
use thiserror::Error;

/// A failed contract read (RPC error, timeout, revert or undecodable data)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// The node answered with a JSON-RPC error object (reverts land here)
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never produced a JSON-RPC answer
    #[error("RPC transport failed: {0}")]
    Transport(String),

    /// The call did not complete within the configured bound
    #[error("{method} timed out after {after_ms}ms")]
    Timeout { method: String, after_ms: u64 },

    /// Return data did not match the method's ABI
    #[error("could not decode {method} return data: {reason}")]
    Decode { method: String, reason: String },

    /// A value that does not fit the token id range
    #[error("{method} returned out-of-range value {value}")]
    OutOfRange { method: String, value: String },

    /// Unusable client configuration (endpoint URL, block tag)
    #[error("invalid RPC configuration: {0}")]
    Config(String),

    /// Malformed wallet or contract address
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// The client answered with a value of the wrong shape for the method
    #[error("{method} returned {actual}, expected {expected}")]
    UnexpectedValue {
        method: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => ChainError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            other => ChainError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::TransportErrorKind;

    #[test]
    fn transport_failure_keeps_its_message() {
        let err: ChainError = TransportErrorKind::custom_str("connection refused").into();
        match err {
            ChainError::Transport(msg) => assert!(msg.contains("connection refused"), "{msg}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn null_response_is_a_transport_error() {
        let err: ChainError = TransportError::NullResp.into();
        assert!(matches!(err, ChainError::Transport(_)));
    }
}
