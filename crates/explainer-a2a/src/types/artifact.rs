//! Artifact types for the A2A protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Part;

/// Name of the artifact that carries tool results
pub const TOOL_RESULTS_ARTIFACT: &str = "ToolResults";

/// An artifact produced as output from a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier for the artifact
    pub artifact_id: String,

    /// Human-readable name
    pub name: String,

    /// Content parts of the artifact
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub parts: Vec<Part>,
}

impl Artifact {
    /// Create an empty artifact with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            artifact_id: Uuid::new_v4().to_string(),
            name: name.into(),
            parts: Vec::new(),
        }
    }

    /// The primary artifact holding an agent's text reply
    pub fn agent_response(agent_id: &str, text: impl Into<String>) -> Self {
        Self::new(format!("{agent_id}Response")).with_part(Part::text(text))
    }

    /// One text part per tool result, each holding the result's JSON string
    pub fn tool_results(results: &[Value]) -> Self {
        results.iter().fold(Self::new(TOOL_RESULTS_ARTIFACT), |artifact, result| {
            artifact.with_part(Part::text(
                serde_json::to_string(result).unwrap_or_default(),
            ))
        })
    }

    /// Add a part to the artifact
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }
}
