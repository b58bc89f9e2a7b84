//! Envelope validation and message normalization.
//!
//! Request bodies are parsed by a total function: anything that is not a JSON
//! object becomes [`RequestEnvelope::Empty`], which then fails the version
//! check like any other bad envelope. Validation runs in a fixed order:
//! version, method, messages, and finally agent lookup.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::agent::{AgentHandle, AgentRegistry};
use crate::error::{RpcError, RpcResult};
use crate::types::{InboundMessage, JSONRPC_VERSION, NormalizedMessage, RequestId, non_empty_str};

/// Method carrying a single `params.message`
pub const METHOD_MESSAGE_SEND: &str = "message/send";

/// Method carrying a `params.messages` list
pub const METHOD_EXECUTE: &str = "execute";

/// Supported JSON-RPC methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `message/send`
    MessageSend,

    /// `execute`
    Execute,
}

impl Method {
    /// Parse a method name, `None` for anything unsupported
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            METHOD_MESSAGE_SEND => Some(Method::MessageSend),
            METHOD_EXECUTE => Some(Method::Execute),
            _ => None,
        }
    }

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::MessageSend => METHOD_MESSAGE_SEND,
            Method::Execute => METHOD_EXECUTE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body as far as it could be parsed
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEnvelope {
    /// The body was a JSON object
    Object(Map<String, Value>),

    /// The body was absent, unreadable, not JSON, or not an object
    Empty,
}

impl RequestEnvelope {
    /// The empty envelope sentinel
    pub fn empty() -> Self {
        RequestEnvelope::Empty
    }

    /// Parse a raw body. Never fails.
    pub fn try_parse(raw: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(fields)) => RequestEnvelope::Object(fields),
            Ok(other) => {
                debug!(kind = json_kind(&other), "Request body is not a JSON object");
                RequestEnvelope::Empty
            }
            Err(e) => {
                debug!(error = %e, "Request body is not valid JSON");
                RequestEnvelope::Empty
            }
        }
    }

    /// Whether this is the empty sentinel
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestEnvelope::Empty)
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match self {
            RequestEnvelope::Object(fields) => fields.get(name),
            RequestEnvelope::Empty => None,
        }
    }

    /// The `jsonrpc` member if it is a string
    pub fn jsonrpc(&self) -> Option<&str> {
        self.field("jsonrpc").and_then(Value::as_str)
    }

    /// The `method` member if it is a string
    pub fn method(&self) -> Option<&str> {
        self.field("method").and_then(Value::as_str)
    }

    /// The caller's request id, or a freshly generated one
    pub fn request_id(&self) -> RequestId {
        RequestId::from_value(self.field("id")).unwrap_or_else(RequestId::generate)
    }

    /// The `params` object, empty when absent or not an object
    pub fn params(&self) -> Map<String, Value> {
        match self.field("params") {
            Some(Value::Object(params)) => params.clone(),
            _ => Map::new(),
        }
    }
}

/// A request that passed envelope validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Requested method
    pub method: Method,

    /// Inbound messages, at least one
    pub messages: Vec<InboundMessage>,

    /// Caller-supplied or generated context id
    pub context_id: String,

    /// Caller-supplied or generated task id
    pub task_id: String,
}

impl ValidatedRequest {
    /// Flatten every inbound message for the agent
    pub fn normalized_messages(&self) -> Vec<NormalizedMessage> {
        self.messages.iter().map(InboundMessage::normalize).collect()
    }
}

/// Check version and method, then extract the messages and ids.
pub fn validate(envelope: &RequestEnvelope) -> RpcResult<ValidatedRequest> {
    if envelope.jsonrpc() != Some(JSONRPC_VERSION) {
        return Err(RpcError::InvalidRequest);
    }

    let method = envelope
        .method()
        .and_then(Method::parse)
        .ok_or_else(|| RpcError::method_not_found(envelope.method()))?;

    let params = envelope.params();
    let messages = extract_messages(method, &params);
    if messages.is_empty() {
        return Err(RpcError::NoMessages);
    }

    Ok(ValidatedRequest {
        method,
        messages,
        context_id: non_empty_str(params.get("contextId"))
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        task_id: non_empty_str(params.get("taskId")).unwrap_or_else(|| Uuid::new_v4().to_string()),
    })
}

/// Pull the inbound messages for `method` out of `params`.
///
/// Entries that are not JSON objects are skipped.
pub fn extract_messages(method: Method, params: &Map<String, Value>) -> Vec<InboundMessage> {
    match method {
        Method::MessageSend => params
            .get("message")
            .and_then(InboundMessage::from_value)
            .into_iter()
            .collect(),
        Method::Execute => params
            .get("messages")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(InboundMessage::from_value).collect())
            .unwrap_or_default(),
    }
}

/// Look up the agent named in the request path
pub fn resolve_agent(
    registry: &dyn AgentRegistry,
    agent_id: &str,
) -> RpcResult<Arc<dyn AgentHandle>> {
    registry
        .get_agent(agent_id)
        .ok_or_else(|| RpcError::agent_not_found(agent_id))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> RequestEnvelope {
        RequestEnvelope::try_parse(value.to_string().as_bytes())
    }

    #[test]
    fn test_try_parse_is_total() {
        assert!(RequestEnvelope::try_parse(b"").is_empty());
        assert!(RequestEnvelope::try_parse(b"{not json").is_empty());
        assert!(RequestEnvelope::try_parse(b"[1,2,3]").is_empty());
        assert!(RequestEnvelope::try_parse(b"\"2.0\"").is_empty());
        assert!(!RequestEnvelope::try_parse(b"{}").is_empty());
    }

    #[test]
    fn test_empty_envelope_fails_version_check() {
        assert_eq!(
            validate(&RequestEnvelope::empty()),
            Err(RpcError::InvalidRequest)
        );
    }

    #[test]
    fn test_version_must_be_string_two_point_zero() {
        for version in [json!("1.0"), json!(2.0), Value::Null] {
            let env = envelope(json!({ "jsonrpc": version, "method": "execute" }));
            assert_eq!(validate(&env), Err(RpcError::InvalidRequest));
        }
    }

    #[test]
    fn test_version_checked_before_method() {
        let env = envelope(json!({ "jsonrpc": "1.0", "method": "bogus" }));
        assert_eq!(validate(&env), Err(RpcError::InvalidRequest));
    }

    #[test]
    fn test_unknown_and_missing_method() {
        let env = envelope(json!({ "jsonrpc": "2.0", "method": "tasks/get" }));
        assert_eq!(
            validate(&env),
            Err(RpcError::method_not_found(Some("tasks/get")))
        );

        let env = envelope(json!({ "jsonrpc": "2.0" }));
        assert_eq!(validate(&env), Err(RpcError::method_not_found(None)));
    }

    #[test]
    fn test_message_send_wraps_single_message() {
        let env = envelope(json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [
                        { "kind": "text", "text": "TypeError:" },
                        { "kind": "text", "text": "x is undefined" }
                    ]
                }
            }
        }));

        let request = validate(&env).unwrap();
        assert_eq!(request.method, Method::MessageSend);

        let normalized = request.normalized_messages();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].content, "TypeError:\nx is undefined");
    }

    #[test]
    fn test_execute_requires_message_list() {
        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "execute",
            "params": { "messages": [] }
        }));
        assert_eq!(validate(&env), Err(RpcError::NoMessages));

        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "execute",
            "params": { "messages": { "role": "user" } }
        }));
        assert_eq!(validate(&env), Err(RpcError::NoMessages));
    }

    #[test]
    fn test_method_selects_params_shape() {
        // execute ignores a single `message`
        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "execute",
            "params": { "message": { "role": "user", "parts": [] } }
        }));
        assert_eq!(validate(&env), Err(RpcError::NoMessages));

        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": { "messages": [{ "role": "user", "parts": [] }] }
        }));
        assert_eq!(validate(&env), Err(RpcError::NoMessages));
    }

    #[test]
    fn test_execute_skips_non_object_entries() {
        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "execute",
            "params": {
                "messages": [
                    "stray",
                    { "role": "user", "parts": [{ "kind": "text", "text": "a" }] },
                    { "role": "agent", "parts": [{ "kind": "text", "text": "b" }] }
                ]
            }
        }));

        let request = validate(&env).unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].role, "agent");
    }

    #[test]
    fn test_ids_supplied_or_generated() {
        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": {
                "message": { "role": "user", "parts": [] },
                "contextId": "C1",
                "taskId": "T1"
            }
        }));
        let request = validate(&env).unwrap();
        assert_eq!(request.context_id, "C1");
        assert_eq!(request.task_id, "T1");

        let env = envelope(json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": { "message": { "role": "user", "parts": [] }, "taskId": "" }
        }));
        let request = validate(&env).unwrap();
        assert!(!request.task_id.is_empty());
        assert!(!request.context_id.is_empty());
        assert_ne!(request.task_id, request.context_id);
    }

    #[test]
    fn test_request_id_resolution() {
        let env = envelope(json!({ "jsonrpc": "2.0", "id": "req-7" }));
        assert_eq!(env.request_id(), RequestId::from("req-7"));

        let env = envelope(json!({ "jsonrpc": "2.0" }));
        assert!(matches!(env.request_id(), RequestId::String(id) if !id.is_empty()));
    }

    #[test]
    fn test_non_object_params_read_as_empty() {
        let env = envelope(json!({ "jsonrpc": "2.0", "method": "execute", "params": [1] }));
        assert!(env.params().is_empty());
        assert_eq!(validate(&env), Err(RpcError::NoMessages));
    }

    #[test]
    fn test_method_round_trip() {
        for method in [Method::MessageSend, Method::Execute] {
            assert_eq!(Method::parse(method.as_str()), Some(method));
        }
        assert_eq!(Method::parse("message/stream"), None);
    }
}
