//! The A2A request pipeline, independent of the HTTP framework.
//!
//! `Received → Validated → AgentInvoked → Assembled → Responded`; any
//! failure short-circuits to `Responded` with an error envelope.

use serde_json::Value;
use tracing::{info, warn};

use crate::agent::AgentRegistry;
use crate::assembler;
use crate::envelope::{self, RequestEnvelope};
use crate::error::RpcError;
use crate::types::{ErrorResponse, RequestId, SuccessResponse};

/// The terminal outcome of one request
#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    /// The agent answered; delivered with HTTP 200
    Success(SuccessResponse),

    /// The request failed; delivered with the error's HTTP status
    Failure {
        /// HTTP status code
        status: u16,
        /// Error envelope
        response: ErrorResponse,
    },
}

impl RpcOutcome {
    fn failure(id: RequestId, error: RpcError) -> Self {
        RpcOutcome::Failure {
            status: error.http_status(),
            response: ErrorResponse::new(id, error.to_error_object()),
        }
    }

    /// HTTP status the outcome is delivered with
    pub fn http_status(&self) -> u16 {
        match self {
            RpcOutcome::Success(_) => 200,
            RpcOutcome::Failure { status, .. } => *status,
        }
    }

    /// Serialize the envelope
    pub fn to_json(&self) -> Value {
        let body = match self {
            RpcOutcome::Success(response) => serde_json::to_value(response),
            RpcOutcome::Failure { response, .. } => serde_json::to_value(response),
        };
        // Envelopes hold only strings, numbers and JSON values, so this cannot fail
        body.unwrap_or(Value::Null)
    }
}

/// Run one request for `agent_id` with the raw `body`
pub async fn dispatch(registry: &dyn AgentRegistry, agent_id: &str, body: &[u8]) -> RpcOutcome {
    let envelope = RequestEnvelope::try_parse(body);
    dispatch_envelope(registry, agent_id, &envelope).await
}

/// Run one request for an already parsed envelope
pub async fn dispatch_envelope(
    registry: &dyn AgentRegistry,
    agent_id: &str,
    envelope: &RequestEnvelope,
) -> RpcOutcome {
    let request_id = envelope.request_id();

    let request = match envelope::validate(envelope) {
        Ok(request) => request,
        Err(e) => {
            warn!(
                request_id = %request_id,
                agent_id = %agent_id,
                code = e.code(),
                method = ?e.rejected_method(),
                error = %e,
                "Rejected A2A request"
            );
            return RpcOutcome::failure(request_id, e);
        }
    };

    let agent = match envelope::resolve_agent(registry, agent_id) {
        Ok(agent) => agent,
        Err(e) => {
            warn!(request_id = %request_id, agent_id = %agent_id, "Unknown agent");
            return RpcOutcome::failure(request_id, e);
        }
    };

    match assembler::execute(agent_id, agent.as_ref(), &request).await {
        Ok(task) => {
            info!(
                request_id = %request_id,
                agent_id = %agent_id,
                task_id = %task.id,
                artifacts = task.artifacts.len(),
                "A2A task completed"
            );
            RpcOutcome::Success(SuccessResponse::new(request_id, task))
        }
        Err(e) => RpcOutcome::failure(request_id, e),
    }
}
