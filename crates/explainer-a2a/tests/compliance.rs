//! A2A Route Compliance Test Suite
//!
//! Drives `POST /a2a/agent/{agentId}` through the Axum router and checks the
//! envelope contract end to end.
//!
//! ## Coverage
//!
//! - **Envelope Validation**: version, method, params shape
//! - **Error Codes**: JSON-RPC codes and HTTP statuses
//! - **Identifiers**: caller-supplied ids are reused across the task
//! - **Artifacts**: primary reply and optional tool results
//! - **Failures**: agent errors surface as -32603 with details

#![cfg(feature = "server")]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use explainer_a2a::{
    A2aServer, AgentError, AgentHandle, AgentOutput, InMemoryAgentRegistry, NormalizedMessage,
    ServerConfig,
};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// =============================================================================
// Test Agents
// =============================================================================

/// Replies with a fixed explanation
struct ExplainStub;

#[async_trait]
impl AgentHandle for ExplainStub {
    async fn generate(&self, messages: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(AgentOutput::text(format!("You read a property of undefined: {last}")))
    }
}

/// Returns a configurable number of tool results
struct ToolAgent {
    results: usize,
}

#[async_trait]
impl AgentHandle for ToolAgent {
    async fn generate(&self, _: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
        let output = (0..self.results).fold(AgentOutput::text("done"), |output, i| {
            output.with_tool_result(json!({ "toolName": "codeExplainTool", "call": i }))
        });
        Ok(output)
    }
}

/// Always fails
struct BrokenAgent;

#[async_trait]
impl AgentHandle for BrokenAgent {
    async fn generate(&self, _: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
        Err(AgentError::generation("Gemini quota exhausted"))
    }
}

/// Records every conversation it is given
#[derive(Clone, Default)]
struct RecordingAgent {
    seen: Arc<Mutex<Vec<Vec<NormalizedMessage>>>>,
}

#[async_trait]
impl AgentHandle for RecordingAgent {
    async fn generate(&self, messages: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(AgentOutput::text("recorded"))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app_with(registry: InMemoryAgentRegistry) -> Router {
    A2aServer::new(registry, ServerConfig::default()).router()
}

fn app() -> Router {
    app_with(
        InMemoryAgentRegistry::new()
            .with_agent("explainAgent", ExplainStub)
            .with_agent("noTools", ToolAgent { results: 0 })
            .with_agent("twoTools", ToolAgent { results: 2 })
            .with_agent("broken", BrokenAgent),
    )
}

async fn post_raw(app: Router, agent_id: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/a2a/agent/{agent_id}"))
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, agent_id: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, agent_id, body.to_string()).await
}

fn send_message(text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "1",
        "method": "message/send",
        "params": {
            "message": {
                "role": "user",
                "parts": [{ "kind": "text", "text": text }]
            }
        }
    })
}

// =============================================================================
// Envelope Validation
// =============================================================================

mod envelope_validation {
    use super::*;

    #[rstest]
    #[case::old_version(json!("1.0"))]
    #[case::numeric_version(json!(2.0))]
    #[case::null_version(Value::Null)]
    #[case::empty_version(json!(""))]
    #[tokio::test]
    async fn bad_version_is_invalid_request(#[case] version: Value) {
        let mut body = send_message("hello");
        body["jsonrpc"] = version;

        let (status, json) = post(app(), "explainAgent", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], -32600);
        assert_eq!(json["error"]["message"], "Invalid JSON-RPC version");
        assert_eq!(json["id"], "1");
    }

    #[rstest]
    #[case::not_json("{ definitely not json")]
    #[case::array("[1, 2, 3]")]
    #[case::empty("")]
    #[tokio::test]
    async fn unparsable_body_is_invalid_request(#[case] raw: &'static str) {
        let (status, json) = post_raw(app(), "explainAgent", raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["error"]["code"], -32600);
        assert!(json["id"].is_string(), "a fresh id is generated");
    }

    #[rstest]
    #[case::unknown(Some("tasks/get"))]
    #[case::streaming(Some("message/stream"))]
    #[case::missing(None)]
    #[tokio::test]
    async fn unsupported_method_is_method_not_found(#[case] method: Option<&str>) {
        let mut body = send_message("hello");
        match method {
            Some(method) => body["method"] = json!(method),
            None => {
                body.as_object_mut().unwrap().remove("method");
            }
        }

        let (status, json) = post(app(), "explainAgent", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], -32601);
        assert_eq!(json["error"]["message"], "Method not found");
    }

    #[rstest]
    #[case::empty_list(json!({ "messages": [] }))]
    #[case::no_params(json!(null))]
    #[case::wrong_shape(json!({ "message": { "role": "user", "parts": [] } }))]
    #[tokio::test]
    async fn execute_without_messages_is_invalid_params(#[case] params: Value) {
        let body = json!({ "jsonrpc": "2.0", "id": "9", "method": "execute", "params": params });

        let (status, json) = post(app(), "explainAgent", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], -32602);
        assert_eq!(json["error"]["message"], "No messages provided");
    }

    #[tokio::test]
    async fn message_send_without_message_is_invalid_params() {
        let body = json!({ "jsonrpc": "2.0", "id": "1", "method": "message/send", "params": {} });

        let (status, json) = post(app(), "explainAgent", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn unknown_agent_is_not_found() {
        let (status, json) = post(app(), "nobody", send_message("hello")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], -32602);
        assert_eq!(json["error"]["message"], "Agent 'nobody' not found");
    }

    #[tokio::test]
    async fn missing_id_is_generated() {
        let mut body = send_message("hello");
        body.as_object_mut().unwrap().remove("id");

        let (status, json) = post(app(), "explainAgent", body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!json["id"].as_str().unwrap().is_empty());
    }
}

// =============================================================================
// Normalization
// =============================================================================

mod normalization {
    use super::*;

    #[tokio::test]
    async fn message_send_yields_one_normalized_message() {
        let agent = RecordingAgent::default();
        let app = app_with(InMemoryAgentRegistry::new().with_agent("rec", agent.clone()));

        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [
                        { "kind": "text", "text": "TypeError: x is undefined" },
                        { "kind": "text", "text": "at render (app.js:10)" }
                    ]
                }
            }
        });
        let (status, _) = post(app, "rec", body).await;
        assert_eq!(status, StatusCode::OK);

        let seen = agent.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            vec![NormalizedMessage::new(
                "user",
                "TypeError: x is undefined\nat render (app.js:10)"
            )]
        );
    }

    #[tokio::test]
    async fn execute_flattens_every_message() {
        let agent = RecordingAgent::default();
        let app = app_with(InMemoryAgentRegistry::new().with_agent("rec", agent.clone()));

        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "execute",
            "params": {
                "messages": [
                    { "role": "user", "parts": [{ "kind": "data", "data": { "code": 42 } }] },
                    { "role": "agent", "parts": [] },
                    { "role": "user", "parts": [{ "kind": "image", "url": "x" }, { "kind": "text", "text": "why?" }] }
                ]
            }
        });
        let (status, _) = post(app, "rec", body).await;
        assert_eq!(status, StatusCode::OK);

        let seen = agent.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![
                NormalizedMessage::new("user", r#"{"code":42}"#),
                NormalizedMessage::new("agent", ""),
                NormalizedMessage::new("user", "\nwhy?"),
            ]
        );
    }

    #[tokio::test]
    async fn scalar_text_is_stringified() {
        let agent = RecordingAgent::default();
        let app = app_with(InMemoryAgentRegistry::new().with_agent("rec", agent.clone()));

        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{ "kind": "text", "text": 42 }, { "kind": "text", "text": false }]
                }
            }
        });
        let (status, json) = post(app, "rec", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["history"][0]["parts"][0]["text"], 42);

        let seen = agent.seen.lock().unwrap();
        assert_eq!(seen[0], vec![NormalizedMessage::new("user", "42\nfalse")]);
    }
}

// =============================================================================
// Task Assembly
// =============================================================================

mod task_assembly {
    use super::*;

    #[tokio::test]
    async fn example_request_completes() {
        let (status, json) = post(app(), "explainAgent", send_message("TypeError: x is undefined")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], "1");
        assert_eq!(json["result"]["kind"], "task");
        assert_eq!(json["result"]["status"]["state"], "completed");
        assert!(
            !json["result"]["artifacts"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .is_empty()
        );
        assert_eq!(json["result"]["artifacts"][0]["name"], "explainAgentResponse");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn supplied_ids_are_reused() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "execute",
            "params": {
                "taskId": "T1",
                "contextId": "C1",
                "messages": [
                    { "role": "user", "parts": [{ "kind": "text", "text": "first" }] },
                    { "role": "user", "taskId": "OTHER", "messageId": "M2",
                      "parts": [{ "kind": "text", "text": "second" }] }
                ]
            }
        });

        let (status, json) = post(app(), "explainAgent", body).await;
        assert_eq!(status, StatusCode::OK);

        let result = &json["result"];
        assert_eq!(result["id"], "T1");
        assert_eq!(result["contextId"], "C1");
        assert_eq!(result["status"]["message"]["taskId"], "T1");

        let history = result["history"].as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0]["taskId"], "T1");
        assert_eq!(history[1]["taskId"], "OTHER");
        assert_eq!(history[1]["messageId"], "M2");
        assert_eq!(history[2]["taskId"], "T1");
        assert_eq!(history[2]["role"], "agent");
    }

    #[tokio::test]
    async fn generated_ids_are_consistent() {
        let (_, json) = post(app(), "explainAgent", send_message("hi")).await;
        let result = &json["result"];

        let task_id = result["id"].as_str().unwrap();
        assert!(!task_id.is_empty());
        assert!(!result["contextId"].as_str().unwrap().is_empty());
        for entry in result["history"].as_array().unwrap() {
            assert_eq!(entry["taskId"], task_id);
            assert!(!entry["messageId"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn history_preserves_inbound_parts() {
        let parts = json!([
            { "kind": "text", "text": "see attached", "metadata": { "source": "ide" } },
            { "kind": "file", "file": { "uri": "file:///trace.log" } }
        ]);
        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": { "message": { "role": "user", "parts": parts.clone() } }
        });

        let (_, json) = post(app(), "explainAgent", body).await;
        let history = json["result"]["history"].as_array().unwrap();

        assert_eq!(history[0]["parts"], parts);
        assert_eq!(history[0]["kind"], "message");
        assert_eq!(history[0]["role"], "user");
    }

    #[tokio::test]
    async fn history_echoes_non_array_parts() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": { "message": { "role": "user", "parts": "stack trace here" } }
        });

        let (status, json) = post(app(), "explainAgent", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["history"][0]["parts"], "stack trace here");
        assert_eq!(json["result"]["history"][1]["parts"][0]["kind"], "text");
    }

    #[tokio::test]
    async fn status_mirrors_agent_reply() {
        let (_, json) = post(app(), "explainAgent", send_message("oops")).await;
        let result = &json["result"];
        let reply = result["history"].as_array().unwrap().last().unwrap();

        assert_eq!(&result["status"]["message"], reply);
        assert_eq!(result["status"]["message"]["kind"], "message");
        assert!(result["status"]["timeStamp"].as_str().unwrap().ends_with('Z'));
    }

    #[rstest]
    #[case::no_tools("noTools", 1)]
    #[case::two_tools("twoTools", 2)]
    #[tokio::test]
    async fn artifact_count_follows_tool_results(
        #[case] agent_id: &str,
        #[case] expected_artifacts: usize,
    ) {
        let (status, json) = post(app(), agent_id, send_message("hello")).await;
        assert_eq!(status, StatusCode::OK);

        let artifacts = json["result"]["artifacts"].as_array().unwrap();
        assert_eq!(artifacts.len(), expected_artifacts);
        if expected_artifacts == 2 {
            assert_eq!(artifacts[1]["name"], "ToolResults");
            let parts = artifacts[1]["parts"].as_array().unwrap();
            assert_eq!(parts.len(), 2);
            let first: Value = serde_json::from_str(parts[0]["text"].as_str().unwrap()).unwrap();
            assert_eq!(first["toolName"], "codeExplainTool");
        }
    }
}

// =============================================================================
// Failure Handling
// =============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn agent_failure_is_internal_error() {
        let (status, json) = post(app(), "broken", send_message("hello")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], "1");
        assert_eq!(json["error"]["code"], -32603);
        assert_eq!(json["error"]["message"], "Internal error");
        assert_eq!(json["error"]["data"]["details"], "Gemini quota exhausted");
        assert!(json.get("result").is_none());
    }

    #[tokio::test]
    async fn requests_are_independent() {
        let app = app();
        let (first, _) = post(app.clone(), "broken", send_message("a")).await;
        let (second, json) = post(app, "explainAgent", send_message("b")).await;

        assert_eq!(first, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(json["result"]["history"].as_array().unwrap().len(), 2);
    }
}
