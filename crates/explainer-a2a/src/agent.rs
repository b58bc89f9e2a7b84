//! Agent capability and registry seams.
//!
//! The A2A route knows nothing about how agents produce replies. It resolves
//! an [`AgentHandle`] through an injected [`AgentRegistry`] and calls
//! [`AgentHandle::generate`] with the normalized conversation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::types::NormalizedMessage;

/// Errors an agent can report from [`AgentHandle::generate`]
///
/// The display text of the error becomes `error.data.details` of the
/// `-32603` response.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Generation failed
    #[error("{0}")]
    Generation(String),

    /// Serialization of agent output failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}

/// What an agent returns for one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentOutput {
    /// Reply text, empty when the agent produced none
    #[serde(default)]
    pub text: String,

    /// Results of tools the agent ran; empty means no tool artifact
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<Value>,
}

impl AgentOutput {
    /// A reply with text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_results: Vec::new(),
        }
    }

    /// Attach a tool result
    pub fn with_tool_result(mut self, result: Value) -> Self {
        self.tool_results.push(result);
        self
    }
}

/// An agent that can answer a conversation turn
#[async_trait]
pub trait AgentHandle: Send + Sync + 'static {
    /// Produce a reply for the given messages
    ///
    /// May suspend for model or network latency. The caller applies no
    /// timeout of its own.
    async fn generate(&self, messages: &[NormalizedMessage]) -> Result<AgentOutput, AgentError>;
}

/// Read-only lookup of agents by id
pub trait AgentRegistry: Send + Sync + 'static {
    /// Resolve an agent, `None` if nothing is registered under `agent_id`
    fn get_agent(&self, agent_id: &str) -> Option<Arc<dyn AgentHandle>>;

    /// Ids of all registered agents, sorted
    fn agent_ids(&self) -> Vec<String>;
}

/// Agent registry backed by a `HashMap`, filled before the server starts
#[derive(Default, Clone)]
pub struct InMemoryAgentRegistry {
    agents: HashMap<String, Arc<dyn AgentHandle>>,
}

impl InMemoryAgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under `agent_id`, replacing any previous one
    #[must_use]
    pub fn with_agent(mut self, agent_id: impl Into<String>, agent: impl AgentHandle) -> Self {
        self.agents.insert(agent_id.into(), Arc::new(agent));
        self
    }

    /// Register an already shared agent
    #[must_use]
    pub fn with_shared_agent(
        mut self,
        agent_id: impl Into<String>,
        agent: Arc<dyn AgentHandle>,
    ) -> Self {
        self.agents.insert(agent_id.into(), agent);
        self
    }

    /// Number of registered agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent is registered
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl AgentRegistry for InMemoryAgentRegistry {
    fn get_agent(&self, agent_id: &str) -> Option<Arc<dyn AgentHandle>> {
        self.agents.get(agent_id).cloned()
    }

    fn agent_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.agents.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl std::fmt::Debug for InMemoryAgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAgentRegistry")
            .field("agents", &self.agent_ids())
            .finish()
    }
}
