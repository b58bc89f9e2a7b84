//! A2A Protocol Error Types
//!
//! Every failure on the A2A route ends up as one of the [`RpcError`] variants,
//! which carry a fixed JSON-RPC 2.0 code and the HTTP status used to deliver
//! the error envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// JSON-RPC code for a malformed envelope or wrong protocol version
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC code for an unsupported method
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC code for missing messages or an unknown agent
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC code for unexpected failures during processing
pub const INTERNAL_ERROR: i32 = -32603;

/// Result type for A2A route operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Errors that can terminate an A2A request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The envelope is missing, unparsable, or not version "2.0"
    #[error("Invalid JSON-RPC version")]
    InvalidRequest,

    /// The method is absent or not one of the supported methods
    #[error("Method not found")]
    MethodNotFound { method: Option<String> },

    /// The params did not yield any message
    #[error("No messages provided")]
    NoMessages,

    /// No agent is registered under the requested id
    #[error("Agent '{agent_id}' not found")]
    AgentNotFound { agent_id: String },

    /// Anything unexpected, agent failures included
    #[error("Internal error")]
    InternalError { details: String },
}

impl RpcError {
    /// Create a method not found error
    pub fn method_not_found(method: Option<&str>) -> Self {
        Self::MethodNotFound {
            method: method.map(str::to_string),
        }
    }

    /// Create an agent not found error
    pub fn agent_not_found(agent_id: impl Into<String>) -> Self {
        Self::AgentNotFound {
            agent_id: agent_id.into(),
        }
    }

    /// Create an internal error carrying the underlying failure text
    pub fn internal(details: impl Into<String>) -> Self {
        Self::InternalError {
            details: details.into(),
        }
    }

    /// The unsupported method a request named, if this error rejected one
    pub fn rejected_method(&self) -> Option<&str> {
        match self {
            RpcError::MethodNotFound { method } => method.as_deref(),
            _ => None,
        }
    }

    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            RpcError::InvalidRequest => INVALID_REQUEST,
            RpcError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            RpcError::NoMessages | RpcError::AgentNotFound { .. } => INVALID_PARAMS,
            RpcError::InternalError { .. } => INTERNAL_ERROR,
        }
    }

    /// HTTP status the error envelope is delivered with
    pub fn http_status(&self) -> u16 {
        match self {
            RpcError::InvalidRequest | RpcError::MethodNotFound { .. } | RpcError::NoMessages => {
                400
            }
            RpcError::AgentNotFound { .. } => 404,
            RpcError::InternalError { .. } => 500,
        }
    }

    /// Build the wire error object
    pub fn to_error_object(&self) -> ErrorObject {
        let object = ErrorObject::new(self.code(), self.to_string());
        match self {
            RpcError::InternalError { details } => {
                object.with_data(json!({ "details": details }))
            }
            _ => object,
        }
    }
}

/// JSON-RPC error object (`error` member of an error envelope)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorObject {
    /// Error code
    pub code: i32,
    /// Error message
    #[cfg_attr(feature = "openapi", schema(example = "No messages provided"))]
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub data: Option<serde_json::Value>,
}

impl ErrorObject {
    /// Create a new error object
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add data to the error object
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<RpcError> for ErrorObject {
    fn from(err: RpcError) -> Self {
        err.to_error_object()
    }
}
