//! The ExplainMyError agent.

use async_trait::async_trait;
use explainer_a2a::{AgentError, AgentHandle, AgentOutput, NormalizedMessage};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::fmt;
use tracing::{debug, info};

use crate::tool::{CodeExplainTool, Explanation, TOOL_NAME};

/// Registry id of the agent
pub const AGENT_ID: &str = "explainAgent";

/// Human-readable agent name
pub const DISPLAY_NAME: &str = "ExplainMyError";

/// Reply sent when the user message has no content
pub const ASK_FOR_CONTEXT: &str = "Please paste the error message you are seeing, \
     ideally with the stack trace or the code snippet that triggers it.";

/// Programming language an error message most likely comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    Python,
    Java,
    TypeScript,
    JavaScript,
}

impl Language {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static RUST_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"panicked at|error\[E\d{4}\]|RUST_BACKTRACE").expect("static regex")
});

static PYTHON_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Traceback \(most recent call last\)|File "[^"]+", line \d+"#)
        .expect("static regex")
});

static JAVA_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Exception in thread|\bat [\w$.]+\([\w$]+\.java:\d+\)|\bjava(?:x)?\.[\w.]+(?:Exception|Error)\b",
    )
    .expect("static regex")
});

static TYPESCRIPT_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bTS\d{4}\b|\.tsx?:\d+").expect("static regex"));

static JAVASCRIPT_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:TypeError|ReferenceError|SyntaxError|RangeError)\b|is not defined|Cannot read propert|is not a function|\.m?jsx?:\d+",
    )
    .expect("static regex")
});

/// Guess the language of an error message
pub fn detect_language(error_message: &str) -> Option<Language> {
    let checks: [(&Lazy<Regex>, Language); 5] = [
        (&RUST_MARKERS, Language::Rust),
        (&PYTHON_MARKERS, Language::Python),
        (&JAVA_MARKERS, Language::Java),
        (&TYPESCRIPT_MARKERS, Language::TypeScript),
        (&JAVASCRIPT_MARKERS, Language::JavaScript),
    ];

    checks
        .into_iter()
        .find(|(markers, _)| markers.is_match(error_message))
        .map(|(_, language)| language)
}

/// Render the reply text for an explanation
pub fn render_reply(language: Option<Language>, explanation: &Explanation) -> String {
    let mut reply = String::new();
    if let Some(language) = language {
        reply.push_str(&format!("Language: {language}\n\n"));
    }
    reply.push_str(explanation.summary.trim());

    if !explanation.suggestion.is_empty() {
        reply.push_str("\n\nSuggestions:");
        for suggestion in &explanation.suggestion {
            reply.push_str("\n- ");
            reply.push_str(suggestion);
        }
    }
    reply
}

/// Agent that explains programming errors in plain English
#[derive(Debug, Clone, Default)]
pub struct ExplainAgent {
    tool: CodeExplainTool,
}

impl ExplainAgent {
    /// Create an agent around `tool`
    pub fn new(tool: CodeExplainTool) -> Self {
        Self { tool }
    }

    /// The explain tool
    pub fn tool(&self) -> &CodeExplainTool {
        &self.tool
    }
}

/// The message to explain: the last user message, or the last message at all
fn select_input(messages: &[NormalizedMessage]) -> Option<&NormalizedMessage> {
    messages
        .iter()
        .rev()
        .find(|message| message.is_user())
        .or_else(|| messages.last())
}

#[async_trait]
impl AgentHandle for ExplainAgent {
    async fn generate(&self, messages: &[NormalizedMessage]) -> Result<AgentOutput, AgentError> {
        let error_message = select_input(messages)
            .map(|message| message.content.trim())
            .unwrap_or_default();

        if error_message.is_empty() {
            debug!(agent = AGENT_ID, "Empty error message, asking for context");
            return Ok(AgentOutput::text(ASK_FOR_CONTEXT));
        }

        let language = detect_language(error_message);
        let explanation = self.tool.explain(error_message).await;

        info!(
            agent = AGENT_ID,
            language = language.map(|l| l.as_str()),
            suggestions = explanation.suggestion.len(),
            "Error explained"
        );

        let record = json!({
            "toolName": TOOL_NAME,
            "args": { "errorMessage": error_message },
            "result": serde_json::to_value(&explanation)?,
        });

        Ok(AgentOutput::text(render_reply(language, &explanation)).with_tool_result(record))
    }
}
