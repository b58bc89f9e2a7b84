//! Task result assembly.
//!
//! Invokes the agent with the normalized conversation and turns its output
//! into a completed [`Task`]: one artifact for the reply text, an optional
//! `ToolResults` artifact, the full history, and a status block mirroring
//! the reply.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

use crate::agent::{AgentHandle, AgentOutput};
use crate::envelope::ValidatedRequest;
use crate::error::{RpcError, RpcResult};
use crate::types::{Artifact, HistoryMessage, NormalizedMessage, Task, TaskStatus};

/// Call the agent once, converting any failure into an internal error.
///
/// Both an `Err` from the agent and a panic inside its future end up as
/// [`RpcError::InternalError`] with the failure text as details.
pub async fn invoke_agent(
    agent: &dyn AgentHandle,
    messages: &[NormalizedMessage],
) -> RpcResult<AgentOutput> {
    match AssertUnwindSafe(agent.generate(messages)).catch_unwind().await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => {
            error!(error = %e, "Agent invocation failed");
            Err(RpcError::internal(e.to_string()))
        }
        Err(panic) => {
            let details = panic_message(panic.as_ref());
            error!(details = %details, "Agent panicked");
            Err(RpcError::internal(details))
        }
    }
}

/// Build the completed task from the request and the agent's output
pub fn assemble_task(agent_id: &str, request: &ValidatedRequest, output: AgentOutput) -> Task {
    let AgentOutput { text, tool_results } = output;

    let mut artifacts = vec![Artifact::agent_response(agent_id, text.clone())];
    if !tool_results.is_empty() {
        artifacts.push(Artifact::tool_results(&tool_results));
    }

    let reply = HistoryMessage::agent_reply(text, &request.task_id);

    let mut history: Vec<HistoryMessage> = request
        .messages
        .iter()
        .map(|message| HistoryMessage::from_inbound(message, &request.task_id))
        .collect();
    history.push(reply.clone());

    Task {
        id: request.task_id.clone(),
        context_id: request.context_id.clone(),
        status: TaskStatus::completed(reply),
        artifacts,
        history,
        kind: "task".to_string(),
    }
}

/// Invoke the agent and assemble the task in one step
pub async fn execute(
    agent_id: &str,
    agent: &dyn AgentHandle,
    request: &ValidatedRequest,
) -> RpcResult<Task> {
    let messages = request.normalized_messages();
    debug!(
        agent_id = %agent_id,
        method = %request.method,
        message_count = messages.len(),
        "Invoking agent"
    );

    let output = invoke_agent(agent, &messages).await?;
    debug!(
        agent_id = %agent_id,
        text_len = output.text.len(),
        tool_results = output.tool_results.len(),
        "Agent replied"
    );

    Ok(assemble_task(agent_id, request, output))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "agent panicked".to_string()
    }
}
