// crates/studio-client/src/transport.rs
// ============================================================================
// Module: Studio Transport Capability
// Description: Request/response seam between the client and the Studio service.
// Purpose: Keep wire transport out of the client while fixing the RPC contract.
// Dependencies: async-trait, serde, serde_json, studio-core, thiserror
// ============================================================================

//! ## Overview
//! The client never opens sockets itself. Every operation becomes one
//! [`RpcRequest`] handed to an injected [`Transport`], which answers with the
//! JSON-RPC `result` value or a [`TransportError`]. Hosts wire an HTTP
//! implementation behind this trait; tests use the in-memory studio.
//!
//! JSON-RPC envelope helpers are provided for transport authors:
//! [`RpcRequest::envelope`] builds the request body and [`decode_response`]
//! turns a response body into a result or an error.
//!
//! Invariants:
//! - Bearer tokens never appear in `Debug` output.
//! - Every [`TransportError`] maps to exactly one [`ClientError`] kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use studio_core::ClientError;
use thiserror::Error;

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Service code for rejected credentials.
pub const CODE_AUTHENTICATION_FAILED: i64 = -32001;
/// Service code for an expired or revoked token.
pub const CODE_TOKEN_EXPIRED: i64 = -32002;
/// Service code for a missing entity.
pub const CODE_NOT_FOUND: i64 = -32004;
/// JSON-RPC code for an unknown method.
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC code for malformed parameters.
pub const CODE_INVALID_PARAMS: i64 = -32602;

// ============================================================================
// SECTION: Request
// ============================================================================

/// One RPC call issued by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct RpcRequest {
    /// Service base URL the call targets.
    pub endpoint: String,
    /// RPC method name (`project.list`, `auth.login`, ...).
    pub method: String,
    /// Method parameters as a JSON object.
    pub params: Value,
    /// Session token sent as a bearer credential, when authenticated.
    pub bearer_token: Option<String>,
}

impl RpcRequest {
    /// Builds the JSON-RPC 2.0 request body for this call.
    #[must_use]
    pub fn envelope(&self, id: u64) -> Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": self.method,
            "params": self.params,
        })
    }

    /// Returns the `Authorization` header value, when a token is attached.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer_token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl fmt::Debug for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcRequest")
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("params", &self.params)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Response Decoding
// ============================================================================

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize, Serialize)]
struct RpcResponse {
    /// Successful result payload.
    #[serde(default)]
    result: Option<Value>,
    /// Error payload.
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

/// JSON-RPC error payload.
#[derive(Debug, Deserialize, Serialize)]
struct RpcErrorBody {
    /// Numeric error code.
    code: i64,
    /// Human-readable message.
    message: String,
}

/// Decodes a JSON-RPC response body into its result value.
///
/// # Errors
///
/// Returns [`TransportError::Rpc`] for error envelopes and
/// [`TransportError::Protocol`] when the body is not a valid envelope.
pub fn decode_response(body: &[u8]) -> Result<Value, TransportError> {
    let response: RpcResponse = serde_json::from_slice(body)
        .map_err(|err| TransportError::Protocol(format!("invalid rpc response: {err}")))?;
    match (response.result, response.error) {
        (_, Some(error)) => Err(TransportError::Rpc {
            code: error.code,
            message: error.message,
        }),
        (Some(result), None) => Ok(result),
        (None, None) => Err(TransportError::Protocol("rpc response has no result".to_string())),
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete (connect, timeout, reset).
    #[error("transport network error: {0}")]
    Network(String),
    /// The service answered with a JSON-RPC error.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Numeric error code.
        code: i64,
        /// Service-provided message.
        message: String,
    },
    /// The service answered with something that is not a valid response.
    #[error("transport protocol error: {0}")]
    Protocol(String),
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(message) => Self::Network(message),
            TransportError::Rpc {
                code,
                message,
            } => match code {
                CODE_AUTHENTICATION_FAILED | CODE_TOKEN_EXPIRED => Self::Authentication(message),
                CODE_NOT_FOUND => Self::NotFound(message),
                CODE_INVALID_PARAMS => Self::InvalidParameters(message),
                _ => Self::Internal(format!("RPC error {code}: {message}")),
            },
            TransportError::Protocol(message) => Self::Internal(message),
        }
    }
}

/// Carries RPC calls to the Studio service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one call and returns its JSON-RPC result value.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the call fails at any layer.
    async fn call(&self, request: RpcRequest) -> Result<Value, TransportError>;
}
