//! # Explainer A2A - Agent-to-Agent Task Endpoint
//!
//! This crate adapts JSON-RPC "agent-to-agent" task requests to pluggable
//! agents and returns their replies as task documents.
//!
//! ## Features
//!
//! - **Envelope Validation**: Total parsing of untrusted bodies, version and
//!   method checks, normalization of `message/send` and `execute` params
//! - **Task Assembly**: Artifacts, history and status built around one agent call
//! - **Agent Seams**: [`AgentHandle`] and [`AgentRegistry`] traits for plugging agents in
//! - **A2A Server**: Axum router for `POST /a2a/agent/{agentId}` (requires `server` feature)
//! - **API Docs**: OpenAPI document and Swagger UI (requires `openapi` feature)
//!
//! ## Error Codes
//!
//! | Condition | HTTP | Code |
//! |-----------|------|------|
//! | Bad version or unparsable body | 400 | -32600 |
//! | Unsupported method | 400 | -32601 |
//! | No messages | 400 | -32602 |
//! | Unknown agent | 404 | -32602 |
//! | Agent failure | 500 | -32603 |
//!
//! ## Example: Dispatching a Request
//!
//! ```rust
//! use async_trait::async_trait;
//! use explainer_a2a::{
//!     AgentError, AgentHandle, AgentOutput, InMemoryAgentRegistry, NormalizedMessage, dispatch,
//! };
//!
//! struct Shout;
//!
//! #[async_trait]
//! impl AgentHandle for Shout {
//!     async fn generate(&self, messages: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
//!         let last = messages.last().map(|m| m.content.to_uppercase()).unwrap_or_default();
//!         Ok(AgentOutput::text(last))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = InMemoryAgentRegistry::new().with_agent("shout", Shout);
//! let body = br#"{"jsonrpc":"2.0","id":"1","method":"message/send",
//!     "params":{"message":{"role":"user","parts":[{"kind":"text","text":"hi"}]}}}"#;
//!
//! let outcome = dispatch(&registry, "shout", body).await;
//! assert_eq!(outcome.http_status(), 200);
//! assert_eq!(outcome.to_json()["result"]["artifacts"][0]["parts"][0]["text"], "HI");
//! # });
//! ```

pub mod agent;
pub mod assembler;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod types;

// Server module (requires server feature)
#[cfg(feature = "server")]
pub mod server;

// API documentation (requires openapi feature)
#[cfg(feature = "openapi")]
pub mod docs;

pub use agent::{AgentError, AgentHandle, AgentOutput, AgentRegistry, InMemoryAgentRegistry};
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use dispatch::{RpcOutcome, dispatch};
pub use envelope::{METHOD_EXECUTE, METHOD_MESSAGE_SEND, Method, RequestEnvelope, ValidatedRequest};
pub use error::{ErrorObject, RpcError, RpcResult};
pub use types::{
    Artifact, DataPart, ErrorResponse, HistoryMessage, InboundMessage, JSONRPC_VERSION,
    NormalizedMessage, Part, RequestId, SuccessResponse, Task, TaskState, TaskStatus, TextPart,
};

// Re-export server types
#[cfg(feature = "server")]
pub use server::{A2aServer, HealthResponse, SERVICE_NAME, ServerError};
