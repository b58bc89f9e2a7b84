//! JSON-RPC response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Task;
use crate::error::ErrorObject;

/// The only protocol version accepted and emitted
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// String identifier
    String(String),

    /// Numeric identifier
    Number(serde_json::Number),
}

impl RequestId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        RequestId::String(Uuid::new_v4().to_string())
    }

    /// Read an identifier from the envelope's `id` member.
    ///
    /// Missing, `null`, empty-string and non-scalar ids all yield `None`.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::String(s) if !s.is_empty() => Some(RequestId::String(s.clone())),
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

/// Success envelope: `{jsonrpc, id, result}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SuccessResponse {
    /// Protocol version, always "2.0"
    #[cfg_attr(feature = "openapi", schema(example = "2.0"))]
    pub jsonrpc: String,

    /// Request identifier
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "1"))]
    pub id: RequestId,

    /// The completed task
    pub result: Task,
}

impl SuccessResponse {
    /// Wrap a task
    pub fn new(id: RequestId, result: Task) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

/// Error envelope: `{jsonrpc, id, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Protocol version, always "2.0"
    #[cfg_attr(feature = "openapi", schema(example = "2.0"))]
    pub jsonrpc: String,

    /// Request identifier
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "1"))]
    pub id: RequestId,

    /// Error details
    pub error: ErrorObject,
}

impl ErrorResponse {
    /// Wrap an error object
    pub fn new(id: RequestId, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error,
        }
    }
}
