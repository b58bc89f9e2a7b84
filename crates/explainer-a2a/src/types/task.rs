//! Task types for the A2A protocol.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{Artifact, HistoryMessage};

/// A task represents one agent invocation and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier, caller-supplied or generated
    pub id: String,

    /// Context identifier, caller-supplied or generated
    pub context_id: String,

    /// Final status of the task
    pub status: TaskStatus,

    /// Outputs produced by the agent
    pub artifacts: Vec<Artifact>,

    /// Every inbound message followed by the agent reply
    pub history: Vec<HistoryMessage>,

    /// Always `"task"`
    pub kind: String,
}

/// Status block of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// ISO-8601 timestamp of the status
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    /// The agent reply that produced this status
    pub message: HistoryMessage,
}

impl TaskStatus {
    /// A completed status stamped with the current time
    pub fn completed(message: HistoryMessage) -> Self {
        Self::completed_at(Utc::now(), message)
    }

    /// A completed status stamped with `at`
    pub fn completed_at(at: DateTime<Utc>, message: HistoryMessage) -> Self {
        Self {
            state: TaskState::Completed,
            time_stamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            message,
        }
    }
}

/// Task lifecycle state
///
/// Requests are answered synchronously, so a task that reaches the wire has
/// always completed; failures are reported as error envelopes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task completed successfully
    Completed,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Completed => write!(f, "completed"),
        }
    }
}
