//! The code-explain tool.
//!
//! Turns an error message into an [`Explanation`]: a short summary and a list
//! of things to try. Well-known JavaScript mistakes are answered from a
//! built-in heuristic; everything else goes to the configured
//! [`TextCompletion`] backend.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::completion::TextCompletion;
use crate::text::{DEFAULT_CHUNK_LEN, chunk_text, clean_text, safe_parse_json};

/// Tool name reported in tool result records
pub const TOOL_NAME: &str = "codeExplainTool";

/// Tool description
pub const TOOL_DESCRIPTION: &str = "Explain programming errors and provide suggestions.";

/// Summary returned when the model cannot be reached or is not configured
pub const FALLBACK_SUMMARY: &str = "AI model could not process your error message.";

/// Suggestions returned alongside [`FALLBACK_SUMMARY`]
pub const FALLBACK_SUGGESTIONS: [&str; 2] = ["Check your Gemini API key.", "Retry the request."];

const UNDEFINED_SUMMARY: &str =
    "You accessed a property or called `.map()` on something undefined.";

const UNDEFINED_SUGGESTIONS: [&str; 3] = [
    "Make sure the variable is initialized.",
    "Add optional chaining: value?.map(...).",
    "Verify the data finished loading before mapping.",
];

/// Explanation of an error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Probable root cause
    pub summary: String,
    /// Fixes to try, most likely first
    #[serde(default)]
    pub suggestion: Vec<String>,
}

impl Explanation {
    /// Create an explanation
    pub fn new<S: Into<String>>(
        summary: impl Into<String>,
        suggestions: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            summary: summary.into(),
            suggestion: suggestions.into_iter().map(Into::into).collect(),
        }
    }

    /// The explanation used when the model is unavailable
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SUMMARY, FALLBACK_SUGGESTIONS)
    }
}

/// Explains programming errors
#[derive(Clone, Default)]
pub struct CodeExplainTool {
    completion: Option<Arc<dyn TextCompletion>>,
}

impl CodeExplainTool {
    /// A tool that only knows the built-in heuristics
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool that falls back to `completion` for unknown errors
    pub fn with_completion(completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            completion: Some(completion),
        }
    }

    /// Whether a completion backend is configured
    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Tool name
    pub fn name(&self) -> &str {
        TOOL_NAME
    }

    /// Tool description
    pub fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    /// JSON Schema of the tool input
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "errorMessage": { "type": "string" }
            },
            "required": ["errorMessage"]
        })
    }

    /// Explain `error_message`. Never fails.
    pub async fn explain(&self, error_message: &str) -> Explanation {
        info!(tool = TOOL_NAME, message_len = error_message.len(), "Explaining error");

        if let Some(explanation) = heuristic(error_message) {
            debug!(tool = TOOL_NAME, "Answered from heuristic");
            return explanation;
        }

        let Some(completion) = &self.completion else {
            warn!(tool = TOOL_NAME, "No completion backend configured");
            return Explanation::fallback();
        };

        match completion.complete(&build_prompt(error_message)).await {
            Ok(reply) => interpret_reply(&reply),
            Err(e) => {
                warn!(
                    tool = TOOL_NAME,
                    error = %e,
                    code = e.error_code(),
                    retryable = e.is_retryable(),
                    "Completion failed"
                );
                Explanation::fallback()
            }
        }
    }
}

impl std::fmt::Debug for CodeExplainTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeExplainTool")
            .field("has_completion", &self.has_completion())
            .finish()
    }
}

/// Built-in answers for errors that need no model
pub fn heuristic(error_message: &str) -> Option<Explanation> {
    if error_message.contains("undefined") || error_message.contains("Cannot read property") {
        return Some(Explanation::new(UNDEFINED_SUMMARY, UNDEFINED_SUGGESTIONS));
    }
    None
}

/// Prompt asking the model for a JSON explanation
pub fn build_prompt(error_message: &str) -> String {
    format!(
        "Explain this programming error clearly.\n\n\
         Error:\n{error_message}\n\n\
         Return ONLY JSON in this format:\n\
         {{\n  \"summary\": \"...\",\n  \"suggestion\": [\"...\", \"...\"]\n}}\n"
    )
}

/// Read a model reply as an explanation.
///
/// A JSON object with a non-empty `summary` is taken as is. Otherwise the
/// cleaned reply is chunked: the first chunk is the summary and the rest are
/// suggestions. A blank reply yields the fallback explanation.
pub fn interpret_reply(reply: &str) -> Explanation {
    let cleaned = clean_text(reply);

    if let Some(explanation) = safe_parse_json(&cleaned).and_then(explanation_from_json) {
        return explanation;
    }

    let mut chunks = chunk_text(&cleaned, DEFAULT_CHUNK_LEN).into_iter();
    let Some(summary) = chunks.next() else {
        return Explanation::fallback();
    };

    Explanation {
        summary,
        suggestion: chunks
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect(),
    }
}

fn explanation_from_json(value: Value) -> Option<Explanation> {
    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .filter(|summary| !summary.is_empty())?;

    let suggestion = match value.get("suggestion") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    };

    Some(Explanation {
        summary: summary.to_string(),
        suggestion,
    })
}
