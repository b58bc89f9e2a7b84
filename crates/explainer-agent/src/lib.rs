//! # Explainer Agent - ExplainMyError
//!
//! An [`AgentHandle`](explainer_a2a::AgentHandle) that explains programming
//! errors in plain English and suggests likely fixes.
//!
//! ## Features
//!
//! - **Heuristics**: Common JavaScript `undefined` mistakes are answered locally
//! - **Model Fallback**: Other errors are sent to Gemini through [`TextCompletion`]
//! - **Language Detection**: Rust, Python, Java, TypeScript and JavaScript errors
//! - **Reply Cleanup**: Tolerant JSON extraction from chatty model replies
//!
//! ## Example
//!
//! ```rust
//! use explainer_a2a::{AgentHandle, NormalizedMessage};
//! use explainer_agent::ExplainAgent;
//!
//! # tokio_test::block_on(async {
//! let agent = ExplainAgent::default();
//! let output = agent
//!     .generate(&[NormalizedMessage::new("user", "TypeError: x is undefined")])
//!     .await
//!     .unwrap();
//!
//! assert!(output.text.starts_with("Language: JavaScript"));
//! assert_eq!(output.tool_results[0]["toolName"], "codeExplainTool");
//! # });
//! ```

pub mod agent;
pub mod completion;
pub mod error;
pub mod text;
pub mod tool;

pub use agent::{AGENT_ID, DISPLAY_NAME, ExplainAgent, Language, detect_language};
pub use completion::{GeminiClient, GeminiConfig, TextCompletion};
pub use error::{CompletionError, CompletionResult};
pub use text::{DEFAULT_CHUNK_LEN, chunk_text, clean_text, safe_parse_json};
pub use tool::{CodeExplainTool, Explanation, TOOL_NAME};
