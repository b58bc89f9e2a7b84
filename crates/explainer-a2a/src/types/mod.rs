//! A2A Protocol Core Types
//!
//! Wire types for the agent-to-agent task endpoint: the parts and messages a
//! caller sends, and the task, artifact and history documents returned.
//!
//! ## Module Structure
//!
//! - [`part`] - Content part types (text, data, opaque)
//! - [`message`] - Inbound, normalized and history messages
//! - [`artifact`] - Task output artifacts
//! - [`task`] - Task and status types
//! - [`rpc`] - JSON-RPC response envelopes

mod artifact;
mod message;
mod part;
mod rpc;
mod task;

pub use artifact::{Artifact, TOOL_RESULTS_ARTIFACT};
pub use message::{AGENT_ROLE, DEFAULT_ROLE, HistoryMessage, InboundMessage, NormalizedMessage};
pub(crate) use message::non_empty_str;
pub use part::{DataPart, Part, TextPart};
pub use rpc::{ErrorResponse, JSONRPC_VERSION, RequestId, SuccessResponse};
pub use task::{Task, TaskState, TaskStatus};
