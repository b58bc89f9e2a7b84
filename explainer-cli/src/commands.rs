//! Subcommand implementations.

use explainer_a2a::{
    A2aServer, AgentError, AgentHandle, ConfigError, InMemoryAgentRegistry, NormalizedMessage,
    ServerConfig, ServerConfigBuilder, ServerError,
};
use explainer_agent::{
    AGENT_ID, CodeExplainTool, DISPLAY_NAME, ExplainAgent, GeminiClient, GeminiConfig,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced by the CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Flags of the `serve` subcommand
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub bind: Option<String>,
    pub max_body_size: Option<usize>,
    pub no_cors: bool,
}

/// Environment configuration with command-line overrides applied
pub fn server_config(options: ServeOptions) -> Result<ServerConfig, CliError> {
    let mut builder = ServerConfigBuilder::from_env()?;
    if let Some(bind) = options.bind {
        builder = builder.bind_addr(bind);
    }
    if let Some(size) = options.max_body_size {
        builder = builder.max_body_size(size);
    }
    if options.no_cors {
        builder = builder.enable_cors(false);
    }
    Ok(builder.build()?)
}

/// The explain tool, backed by Gemini when an API key is configured
pub fn explain_tool() -> CodeExplainTool {
    match GeminiConfig::from_env() {
        Some(config) => {
            info!(model = %config.model, "Gemini fallback enabled");
            CodeExplainTool::with_completion(Arc::new(GeminiClient::new(config)))
        }
        None => {
            warn!("GOOGLE_GENERATIVE_AI_API_KEY not set, only built-in heuristics are available");
            CodeExplainTool::new()
        }
    }
}

/// Registry with every agent this binary serves
pub fn build_registry() -> InMemoryAgentRegistry {
    InMemoryAgentRegistry::new().with_agent(AGENT_ID, ExplainAgent::new(explain_tool()))
}

/// `explainer serve`
pub async fn run_serve(options: ServeOptions) -> Result<(), CliError> {
    let config = server_config(options)?;
    info!(
        agent = DISPLAY_NAME,
        bind = %config.bind_addr,
        max_body_size = config.max_body_size,
        cors = config.enable_cors,
        "Starting explainer"
    );

    A2aServer::new(build_registry(), config).serve().await?;
    Ok(())
}

/// `explainer explain <message>`
pub async fn run_explain(message: &str, json: bool) -> Result<(), CliError> {
    let agent = ExplainAgent::new(explain_tool());
    let output = agent
        .generate(&[NormalizedMessage::new("user", message)])
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.text);
    }
    Ok(())
}
