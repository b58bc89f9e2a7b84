//! Text completion backends.
//!
//! The explain tool only needs "prompt in, text out", so the seam is a single
//! [`TextCompletion`] trait. [`GeminiClient`] implements it against the Google
//! Generative Language REST API.
//!
//! ## Environment Variables
//!
//! - `GOOGLE_GENERATIVE_AI_API_KEY` - API key; without it no client is built
//! - `EXPLAINER_GEMINI_MODEL` - Model name (default: `gemini-1.5-flash`)
//! - `EXPLAINER_GEMINI_BASE_URL` - Models endpoint (default: the public v1beta API)

use async_trait::async_trait;
use explainer_a2a::config::get_env_string;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CompletionError, CompletionResult};

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini models endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

/// Produces a text reply for a prompt.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Complete `prompt`.
    async fn complete(&self, prompt: &str) -> CompletionResult<String>;
}

/// Connection settings for [`GeminiClient`]
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`
    pub model: String,
    /// Models endpoint without trailing slash
    pub base_url: String,
}

impl GeminiConfig {
    /// Settings for `api_key` with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Read settings from the environment.
    ///
    /// Returns `None` when no (non-blank) API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = get_env_string(API_KEY_ENV).filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key.trim());

        if let Some(model) = get_env_string("EXPLAINER_GEMINI_MODEL").filter(|m| !m.is_empty()) {
            config = config.with_model(model);
        }
        if let Some(url) = get_env_string("EXPLAINER_GEMINI_BASE_URL").filter(|u| !u.is_empty()) {
            config = config.with_base_url(url);
        }
        Some(config)
    }

    /// Use a different model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// Wire types for generateContent

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client with its own connection pool
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client over an existing `reqwest::Client`
    pub fn with_http_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Client settings
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl TextCompletion for GeminiClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %self.config.model, status = status.as_u16(), "Gemini request failed");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.into_text().ok_or(CompletionError::EmptyResponse)
    }
}
