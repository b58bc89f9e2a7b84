//! Message types for the A2A protocol.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::Part;

/// Role assigned to inbound messages that don't declare one
pub const DEFAULT_ROLE: &str = "user";

/// Role of synthesized agent replies
pub const AGENT_ROLE: &str = "agent";

/// A message as received in the request params
///
/// Inbound messages are read leniently: only `role`, `parts`, `messageId` and
/// `taskId` are looked at, and each of them may be missing or malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Role of the sender, `"user"` when absent
    pub role: String,

    /// Content parts, exactly as sent
    pub parts: Vec<Part>,

    /// The `parts` member as sent, when it was present but not an array
    pub raw_parts: Option<Value>,

    /// Caller-supplied message id
    pub message_id: Option<String>,

    /// Caller-supplied task id
    pub task_id: Option<String>,
}

impl InboundMessage {
    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: DEFAULT_ROLE.to_string(),
            parts: vec![Part::text(text)],
            raw_parts: None,
            message_id: None,
            task_id: None,
        }
    }

    /// Read a message out of an arbitrary JSON value.
    ///
    /// Returns `None` when the value is not an object. A `parts` member that
    /// is not an array is read as no parts and kept in `raw_parts`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;

        let role = fields
            .get("role")
            .and_then(Value::as_str)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_ROLE)
            .to_string();

        let (parts, raw_parts) = match fields.get("parts") {
            Some(Value::Array(parts)) => {
                (parts.iter().cloned().map(Part::from_value).collect(), None)
            }
            Some(Value::Null) | None => (Vec::new(), None),
            Some(other) => (Vec::new(), Some(other.clone())),
        };

        Some(Self {
            role,
            parts,
            raw_parts,
            message_id: non_empty_str(fields.get("messageId")),
            task_id: non_empty_str(fields.get("taskId")),
        })
    }

    /// Flatten into the form handed to agents
    pub fn normalize(&self) -> NormalizedMessage {
        let content = self
            .parts
            .iter()
            .map(Part::to_content)
            .collect::<Vec<_>>()
            .join("\n");

        NormalizedMessage {
            role: self.role.clone(),
            content,
        }
    }
}

/// Read a JSON member as an identifier, treating empty strings as absent
pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The flattened `{role, content}` form passed to agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Role of the sender
    pub role: String,

    /// Parts joined by newline
    pub content: String,
}

impl NormalizedMessage {
    /// Create a normalized message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Whether this message was sent by the user
    pub fn is_user(&self) -> bool {
        self.role == DEFAULT_ROLE
    }
}

/// A message as recorded in the task history and status
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    /// Always `"message"`
    pub kind: String,

    /// Role of the sender
    pub role: String,

    /// Content parts
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub parts: Vec<Part>,

    /// Written in place of `parts` when the inbound message sent a non-array
    #[serde(skip)]
    pub raw_parts: Option<Value>,

    /// Message identifier
    pub message_id: String,

    /// Task this message belongs to
    pub task_id: String,
}

impl HistoryMessage {
    /// Record an inbound message under the resolved task id
    pub fn from_inbound(message: &InboundMessage, task_id: &str) -> Self {
        Self {
            kind: "message".to_string(),
            role: message.role.clone(),
            parts: message.parts.clone(),
            raw_parts: message.raw_parts.clone(),
            message_id: message
                .message_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            task_id: message
                .task_id
                .clone()
                .unwrap_or_else(|| task_id.to_string()),
        }
    }

    /// Synthesize the agent reply carrying `text` as a single text part
    pub fn agent_reply(text: impl Into<String>, task_id: &str) -> Self {
        Self {
            kind: "message".to_string(),
            role: AGENT_ROLE.to_string(),
            parts: vec![Part::text(text)],
            raw_parts: None,
            message_id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
        }
    }
}

impl Serialize for HistoryMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HistoryMessage", 5)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("role", &self.role)?;
        match &self.raw_parts {
            Some(raw) => state.serialize_field("parts", raw)?,
            None => state.serialize_field("parts", &self.parts)?,
        }
        state.serialize_field("messageId", &self.message_id)?;
        state.serialize_field("taskId", &self.task_id)?;
        state.end()
    }
}
