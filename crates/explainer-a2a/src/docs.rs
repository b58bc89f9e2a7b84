//! API documentation handlers
//!
//! OpenAPI document and Swagger UI page for the A2A routes. The request
//! schemas here describe what callers send; the route itself reads bodies
//! leniently through [`RequestEnvelope`](crate::envelope::RequestEnvelope).

use axum::response::{Html, Json};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::error::ErrorObject;
use crate::server::HealthResponse;
use crate::types::{
    Artifact, ErrorResponse, HistoryMessage, SuccessResponse, Task, TaskState, TaskStatus,
};

/// JSON-RPC request accepted by `POST /a2a/agent/{agent_id}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct A2aRequest {
    /// Must be "2.0"
    #[schema(example = "2.0")]
    pub jsonrpc: String,

    /// Request id, generated when absent
    #[schema(example = "req-1")]
    pub id: Option<String>,

    /// `message/send` or `execute`
    #[schema(example = "message/send")]
    pub method: String,

    /// Method parameters
    pub params: A2aParams,
}

/// Params of a task request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct A2aParams {
    /// The single message of a `message/send` request
    pub message: Option<A2aMessage>,

    /// The conversation of an `execute` request
    pub messages: Option<Vec<A2aMessage>>,

    /// Task id to reuse, generated when absent
    #[schema(example = "task-123")]
    pub task_id: Option<String>,

    /// Context id to reuse, generated when absent
    pub context_id: Option<String>,
}

/// An inbound message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct A2aMessage {
    /// Sender role, "user" when absent
    #[schema(example = "user")]
    pub role: Option<String>,

    /// `{kind: "text", text}` and `{kind: "data", data}` parts are read,
    /// other parts are echoed in the history only
    #[schema(value_type = Vec<Object>)]
    pub parts: Vec<serde_json::Value>,

    /// Message id, generated when absent
    pub message_id: Option<String>,

    /// Task id, the request's task id when absent
    pub task_id: Option<String>,
}

/// GET /docs - Swagger UI for interactive API documentation
pub async fn swagger_ui() -> Html<&'static str> {
    Html(
        r#"
<!DOCTYPE html>
<html>
<head>
    <title>Explainer API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@3.25.0/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@3.25.0/swagger-ui-bundle.js"></script>
    <script>
        SwaggerUIBundle({
            url: '/api-docs/openapi.json',
            dom_id: '#swagger-ui',
            presets: [
                SwaggerUIBundle.presets.apis,
                SwaggerUIBundle.presets.standalone
            ]
        });
    </script>
</body>
</html>
        "#,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::server::run_task, crate::server::health),
    components(schemas(
        A2aRequest,
        A2aParams,
        A2aMessage,
        SuccessResponse,
        ErrorResponse,
        ErrorObject,
        Task,
        TaskStatus,
        TaskState,
        Artifact,
        HistoryMessage,
        HealthResponse
    )),
    tags(
        (name = "a2a", description = "Agent-to-agent task endpoint"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Explainer A2A API",
        version = "0.1.0",
        description = "JSON-RPC endpoint that runs registered agents and returns their replies as A2A tasks"
    ),
    servers((url = "http://localhost:4111", description = "Local development server"))
)]
struct ApiDoc;

/// The OpenAPI document for the A2A routes
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// GET /api-docs/openapi.json - OpenAPI specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
