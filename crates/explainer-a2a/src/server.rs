//! A2A Protocol Server
//!
//! Exposes the agents of an [`AgentRegistry`] over HTTP:
//!
//! - `POST /a2a/agent/{agent_id}` runs one JSON-RPC task request
//! - `GET /health` reports liveness and the registered agent ids
//! - `GET /docs` and `GET /api-docs/openapi.json` serve the API documentation
//!   (requires `openapi` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use explainer_a2a::{A2aServer, InMemoryAgentRegistry, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = InMemoryAgentRegistry::new().with_agent("explainAgent", my_agent);
//!     let server = A2aServer::new(registry, ServerConfig::default());
//!     server.serve().await.unwrap();
//! }
//! ```

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::agent::AgentRegistry;
use crate::config::ServerConfig;
use crate::dispatch::{RpcOutcome, dispatch, dispatch_envelope};
use crate::envelope::RequestEnvelope;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "explainer";

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    #[cfg_attr(feature = "openapi", schema(example = "healthy"))]
    pub status: String,

    /// Service name
    #[cfg_attr(feature = "openapi", schema(example = "explainer"))]
    pub service: String,

    /// Registered agent ids
    pub agents: Vec<String>,

    /// RFC 3339 time of the check
    pub timestamp: String,
}

/// Errors starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared application state
struct AppState<R: AgentRegistry> {
    registry: Arc<R>,
}

impl<R: AgentRegistry> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// A2A Protocol Server
pub struct A2aServer<R: AgentRegistry> {
    registry: Arc<R>,
    config: ServerConfig,
}

impl<R: AgentRegistry> A2aServer<R> {
    /// Create a server over `registry`
    pub fn new(registry: R, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router for this server
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: Arc::clone(&self.registry),
        };

        let router = Router::new()
            .route("/a2a/agent/{agent_id}", post(run_task::<R>))
            .route("/health", get(health::<R>));

        #[cfg(feature = "openapi")]
        let router = router
            .route("/docs", get(crate::docs::swagger_ui))
            .route("/api-docs/openapi.json", get(crate::docs::openapi_spec));

        let router = router
            .with_state(state)
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Serve on the configured bind address until the process stops
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr.clone();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!(
            address = %addr,
            agents = ?self.registry.agent_ids(),
            "A2A server starting"
        );

        axum::serve(listener, self.router())
            .await
            .map_err(ServerError::Serve)
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// POST /a2a/agent/{agent_id} - Run a task request
///
/// A body that cannot be read (too large, broken stream) is treated like an
/// unparsable one, so the caller still gets a JSON-RPC error envelope.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/a2a/agent/{agent_id}",
    tag = "a2a",
    params(("agent_id" = String, Path, description = "Registered agent id", example = "explainAgent")),
    request_body = crate::docs::A2aRequest,
    responses(
        (status = 200, description = "Task completed", body = crate::types::SuccessResponse),
        (status = 400, description = "Invalid request, unsupported method or no messages", body = crate::types::ErrorResponse),
        (status = 404, description = "Agent not found", body = crate::types::ErrorResponse),
        (status = 500, description = "Agent failed", body = crate::types::ErrorResponse)
    )
))]
pub(crate) async fn run_task<R: AgentRegistry>(
    State(state): State<AppState<R>>,
    Path(agent_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> RpcOutcome {
    debug!(agent_id = %agent_id, "Received A2A request");

    match body {
        Ok(bytes) => dispatch(state.registry.as_ref(), &agent_id, &bytes).await,
        Err(rejection) => {
            debug!(error = %rejection, "Request body could not be read");
            dispatch_envelope(state.registry.as_ref(), &agent_id, &RequestEnvelope::empty()).await
        }
    }
}

/// GET /health - Liveness and registered agents
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
))]
pub(crate) async fn health<R: AgentRegistry>(
    State(state): State<AppState<R>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        agents: state.registry.agent_ids(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

impl IntoResponse for RpcOutcome {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
