//! Content part types for the A2A protocol.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A content part within a message or artifact
///
/// Parts are tagged by `kind`. Anything that is not a well-formed text or
/// data part is kept verbatim as [`Part::Other`] so it can be echoed back in
/// the task history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Part {
    /// Text content
    #[serde(rename = "text")]
    Text(TextPart),

    /// Structured data
    #[serde(rename = "data")]
    Data(DataPart),

    /// Unrecognized part, preserved as received
    #[serde(untagged)]
    Other(Value),
}

impl Part {
    /// Create a text part
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text(TextPart {
            text: content.into(),
            extra: Map::new(),
        })
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Part::Data(DataPart {
            data,
            extra: Map::new(),
        })
    }

    /// Get the text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    /// Flatten this part into the plain text handed to agents.
    ///
    /// Text is used verbatim, data is JSON-stringified, and anything else
    /// contributes an empty string. A text part whose `text` is a number or
    /// boolean contributes that scalar's string form.
    pub fn to_content(&self) -> String {
        match self {
            Part::Text(t) => t.text.clone(),
            Part::Data(d) => serde_json::to_string(&d.data).unwrap_or_default(),
            Part::Other(raw) => scalar_text(raw).unwrap_or_default(),
        }
    }

    /// Classify a raw JSON value as a part. Never fails.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Part::Other(value);
        };

        let mut body = fields.clone();
        let parsed = match body.remove("kind").as_ref().and_then(Value::as_str) {
            Some("text") => serde_json::from_value::<TextPart>(Value::Object(body))
                .ok()
                .map(Part::Text),
            Some("data") => serde_json::from_value::<DataPart>(Value::Object(body))
                .ok()
                .map(Part::Data),
            _ => None,
        };

        parsed.unwrap_or(Part::Other(Value::Object(fields)))
    }
}

/// String form of a scalar `text` member on a `kind: "text"` part
fn scalar_text(raw: &Value) -> Option<String> {
    let fields = raw.as_object()?;
    if fields.get("kind").and_then(Value::as_str) != Some("text") {
        return None;
    }
    match fields.get("text")? {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Part::from_value)
    }
}

/// Text content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPart {
    /// The text content
    pub text: String,

    /// Any additional fields sent by the caller
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured data part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPart {
    /// The structured data
    pub data: Value,

    /// Any additional fields sent by the caller
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
